use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use chrono::Duration;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Minimum notional (USDC) for a trade to qualify.
    pub min_trade_amount: Decimal,
    /// How recently a wallet must have first appeared to count as "new".
    pub lookback_hours: f64,
    pub poll_interval_secs: u64,
    /// Ceiling for the failure backoff interval.
    pub max_backoff_secs: u64,
    /// Batch size per fetch.
    pub fetch_limit: u32,
    pub execution_enabled: bool,

    // API endpoint overrides (defaults point at production Polymarket)
    pub data_api_url: Option<String>,
    pub gamma_api_url: Option<String>,

    // Telegram notifications (optional)
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl AppConfig {
    /// Load from the environment. Missing variables fall back to defaults;
    /// present-but-invalid values are fatal, before the loop ever starts.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            min_trade_amount: parse_or("MIN_TRADE_AMOUNT", Decimal::from(1_000))?,
            lookback_hours: parse_or("LOOKBACK_HOURS", 24.0)?,
            poll_interval_secs: parse_or("POLL_INTERVAL_SECS", 60)?,
            max_backoff_secs: parse_or("MAX_BACKOFF_SECS", 600)?,
            fetch_limit: parse_or("FETCH_LIMIT", 1_000)?,
            execution_enabled: parse_or("EXECUTION_ENABLED", false)?,

            data_api_url: env::var("DATA_API_URL").ok(),
            gamma_api_url: env::var("GAMMA_API_URL").ok(),

            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").ok(),
            telegram_chat_id: env::var("TELEGRAM_CHAT_ID").ok(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.min_trade_amount <= Decimal::ZERO {
            anyhow::bail!("MIN_TRADE_AMOUNT must be positive");
        }
        if self.lookback_hours <= 0.0 {
            anyhow::bail!("LOOKBACK_HOURS must be positive");
        }
        if self.poll_interval_secs == 0 {
            anyhow::bail!("POLL_INTERVAL_SECS must be at least 1");
        }
        if self.fetch_limit == 0 {
            anyhow::bail!("FETCH_LIMIT must be at least 1");
        }
        Ok(())
    }

    pub fn lookback(&self) -> Duration {
        Duration::seconds((self.lookback_hours * 3600.0).round() as i64)
    }

    pub fn poll_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.poll_interval_secs)
    }

    pub fn max_backoff(&self) -> StdDuration {
        StdDuration::from_secs(self.max_backoff_secs)
    }

    /// Returns true if both Telegram credentials are configured.
    pub fn has_telegram(&self) -> bool {
        self.telegram_bot_token.is_some() && self.telegram_chat_id.is_some()
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key}={raw}: {e}")),
        Err(_) => Ok(default),
    }
}
