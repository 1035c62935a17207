use async_trait::async_trait;
use serde_json::json;

use crate::models::Signal;

/// Where qualifying signals go. Fire-and-forget from the loop's perspective:
/// implementations log their own failures and never propagate them.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, signal: &Signal);
}

fn shorten_wallet(wallet: &str) -> String {
    if wallet.len() > 10 {
        format!("{}...{}", &wallet[..6], &wallet[wallet.len() - 4..])
    } else {
        wallet.to_string()
    }
}

// ---------------------------------------------------------------------------
// Console notifier
// ---------------------------------------------------------------------------

/// Writes a signal banner to the log. Always on.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl NotificationSink for LogNotifier {
    async fn notify(&self, signal: &Signal) {
        tracing::info!(
            wallet = %signal.trade.wallet,
            market = %signal.trade.market_id,
            question = %signal.market.question,
            outcome = %signal.trade.outcome,
            side = %signal.trade.side,
            notional = %signal.trade.notional.round_dp(2),
            wallet_age_mins = signal.wallet_age.num_minutes(),
            "COPY TRADE SIGNAL"
        );
    }
}

// ---------------------------------------------------------------------------
// Telegram notifier
// ---------------------------------------------------------------------------

/// Telegram notification service. Failures are logged but never block the
/// main flow.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    http: reqwest::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            bot_token,
            chat_id,
        }
    }

    async fn send(&self, message: &str) {
        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            self.bot_token
        );

        let body = json!({
            "chat_id": self.chat_id,
            "text": message,
            "parse_mode": "Markdown",
        });

        match self.http.post(&url).json(&body).send().await {
            Ok(resp) => {
                if !resp.status().is_success() {
                    tracing::warn!(
                        status = %resp.status(),
                        "Telegram sendMessage returned non-2xx"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to send Telegram notification");
            }
        }
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    async fn notify(&self, signal: &Signal) {
        self.send(&format_signal(signal)).await;
    }
}

/// Format a signal for Telegram.
pub fn format_signal(signal: &Signal) -> String {
    format!(
        "*Copy Trade Signal*\nWallet: `{}` (first seen {}h ago)\nMarket: {}\nOutcome: {}\nSide: {}\nAmount: ${} USDC",
        shorten_wallet(&signal.trade.wallet),
        signal.wallet_age.num_hours(),
        signal.market.question,
        signal.trade.outcome,
        signal.trade.side,
        signal.trade.notional.round_dp(2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MarketDetails, Side, Trade};
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    #[test]
    fn test_shorten_wallet() {
        assert_eq!(
            shorten_wallet("0x1234567890abcdef"),
            "0x1234...cdef"
        );
        assert_eq!(shorten_wallet("0xshort"), "0xshort");
    }

    #[test]
    fn test_format_signal() {
        let signal = Signal {
            trade: Trade {
                trade_id: "t1".into(),
                wallet: "0x1234567890abcdef".into(),
                market_id: "market_1".into(),
                outcome: "Yes".into(),
                side: Side::Buy,
                size: Decimal::from(3000),
                price: Decimal::new(50, 2),
                notional: Decimal::from(1500),
                timestamp: Utc::now(),
            },
            market: MarketDetails {
                question: "Will it rain tomorrow?".into(),
                outcomes: vec!["Yes".into(), "No".into()],
            },
            wallet_age: Duration::hours(2),
            generated_at: Utc::now(),
        };

        let msg = format_signal(&signal);
        assert!(msg.contains("0x1234...cdef"));
        assert!(msg.contains("Will it rain tomorrow?"));
        assert!(msg.contains("$1500.00 USDC"));
        assert!(msg.contains("first seen 2h ago"));
    }
}
