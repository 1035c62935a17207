use async_trait::async_trait;
use thiserror::Error;

use crate::models::Signal;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("order rejected: {0}")]
    Rejected(String),

    #[error("execution backend unavailable: {0}")]
    Unavailable(String),
}

/// Result of a dispatched order.
#[derive(Debug, Clone)]
pub struct OrderResult {
    /// False for dry-run dispatches that never reached the venue.
    pub placed: bool,
}

/// Extension point for placing real orders off a signal.
///
/// The polling loop only ever calls this when execution is enabled, and a
/// failure here is logged without affecting notification delivery or the
/// loop itself.
#[async_trait]
pub trait ExecutionSink: Send + Sync {
    async fn execute(&self, signal: &Signal) -> Result<OrderResult, ExecutionError>;
}

/// Default executor: logs the order intent and places nothing. Running
/// without venue credentials is always pure monitoring.
#[derive(Debug, Default)]
pub struct NoopExecutor;

#[async_trait]
impl ExecutionSink for NoopExecutor {
    async fn execute(&self, signal: &Signal) -> Result<OrderResult, ExecutionError> {
        tracing::info!(
            wallet = %signal.trade.wallet,
            market = %signal.trade.market_id,
            side = %signal.trade.side,
            notional = %signal.trade.notional,
            "[DRY-RUN] Would place copy order"
        );
        Ok(OrderResult { placed: false })
    }
}
