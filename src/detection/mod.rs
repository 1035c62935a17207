pub mod classifier;
pub mod dedup;
pub mod poller;
pub mod wallet_age;

pub use dedup::SeenTrades;
pub use poller::{run_poller, PollerConfig, SignalPipeline};
pub use wallet_age::{WalletAgeTracker, WalletRecord};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{MarketDetails, Trade};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("trade source unavailable: {0}")]
    Unavailable(String),

    #[error("trade source rate limited")]
    RateLimited,
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("market metadata unavailable: {0}")]
    Unavailable(String),
}

/// Venue trade feed. Returns a bounded batch of recent trades; ordering is
/// venue-defined (the Data API is most-recent-first), so the pipeline sorts
/// to chronological ascending before processing.
#[async_trait]
pub trait TradeSource: Send + Sync {
    async fn fetch_recent_trades(&self, limit: u32) -> Result<Vec<Trade>, SourceError>;
}

/// Market metadata lookup used to enrich signals. Failures are non-fatal:
/// a qualifying trade still produces a signal with placeholder details.
#[async_trait]
pub trait MarketMetadata: Send + Sync {
    async fn fetch_market(&self, market_id: &str) -> Result<MarketDetails, MetadataError>;
}
