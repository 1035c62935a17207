use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::models::{MarketDetails, Signal, Trade};

use super::MarketMetadata;

/// A trade qualifies when the wallet is new AND the notional clears the
/// threshold. Decimal comparison is exact, so a trade of exactly the
/// threshold qualifies on every run.
pub fn qualifies(trade: &Trade, wallet_is_new: bool, min_trade_amount: Decimal) -> bool {
    wallet_is_new && trade.notional >= min_trade_amount
}

/// Classify one trade. Returns a signal iff the trade qualifies; a
/// non-qualifying trade is simply not signal-worthy, not an error.
///
/// Qualifying trades are enriched with market details. When the lookup
/// fails the signal is still emitted with a placeholder market, so that a
/// flaky metadata API cannot suppress alerts.
pub async fn classify<M: MarketMetadata + ?Sized>(
    trade: &Trade,
    wallet_is_new: bool,
    min_trade_amount: Decimal,
    wallet_age: Duration,
    metadata: &M,
    generated_at: DateTime<Utc>,
) -> Option<Signal> {
    if !qualifies(trade, wallet_is_new, min_trade_amount) {
        return None;
    }

    let market = match metadata.fetch_market(&trade.market_id).await {
        Ok(details) => details,
        Err(e) => {
            tracing::warn!(
                error = %e,
                market = %trade.market_id,
                "Market lookup failed, emitting signal with placeholder details"
            );
            MarketDetails::unknown()
        }
    };

    Some(Signal {
        trade: trade.clone(),
        market,
        wallet_age,
        generated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::MetadataError;
    use crate::models::Side;
    use async_trait::async_trait;

    struct FixedMetadata;

    #[async_trait]
    impl MarketMetadata for FixedMetadata {
        async fn fetch_market(&self, _market_id: &str) -> Result<MarketDetails, MetadataError> {
            Ok(MarketDetails {
                question: "Will it rain tomorrow?".into(),
                outcomes: vec!["Yes".into(), "No".into()],
            })
        }
    }

    struct FailingMetadata;

    #[async_trait]
    impl MarketMetadata for FailingMetadata {
        async fn fetch_market(&self, market_id: &str) -> Result<MarketDetails, MetadataError> {
            Err(MetadataError::Unavailable(format!("no such market {market_id}")))
        }
    }

    fn make_trade(notional: &str) -> Trade {
        let notional: Decimal = notional.parse().unwrap();
        Trade {
            trade_id: "t1".into(),
            wallet: "0xaaa".into(),
            market_id: "market_1".into(),
            outcome: "Yes".into(),
            side: Side::Buy,
            size: Decimal::from(100),
            price: notional / Decimal::from(100),
            notional,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_qualifies_boundary_at_threshold() {
        let min = Decimal::from(1000);

        // Exactly the threshold qualifies
        assert!(qualifies(&make_trade("1000.00"), true, min));
        // A cent below does not
        assert!(!qualifies(&make_trade("999.99"), true, min));
        assert!(qualifies(&make_trade("1500"), true, min));
    }

    #[test]
    fn test_old_wallet_never_qualifies() {
        let min = Decimal::from(1000);
        assert!(!qualifies(&make_trade("50000"), false, min));
    }

    #[tokio::test]
    async fn test_classify_enriches_with_market_details() {
        let signal = classify(
            &make_trade("1500"),
            true,
            Decimal::from(1000),
            Duration::hours(1),
            &FixedMetadata,
            Utc::now(),
        )
        .await
        .expect("trade should qualify");

        assert_eq!(signal.market.question, "Will it rain tomorrow?");
        assert_eq!(signal.trade.notional, Decimal::from(1500));
        assert_eq!(signal.wallet_age, Duration::hours(1));
    }

    #[tokio::test]
    async fn test_classify_metadata_failure_uses_placeholder() {
        let signal = classify(
            &make_trade("1500"),
            true,
            Decimal::from(1000),
            Duration::hours(1),
            &FailingMetadata,
            Utc::now(),
        )
        .await
        .expect("signal must not be dropped on metadata failure");

        assert_eq!(signal.market.question, MarketDetails::unknown().question);
    }

    #[tokio::test]
    async fn test_classify_below_threshold_returns_none() {
        let signal = classify(
            &make_trade("500"),
            true,
            Decimal::from(1000),
            Duration::hours(1),
            &FixedMetadata,
            Utc::now(),
        )
        .await;

        assert!(signal.is_none());
    }
}
