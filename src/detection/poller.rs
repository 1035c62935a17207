use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tokio::sync::watch;
use tokio::time::sleep;

use crate::execution::ExecutionSink;
use crate::services::NotificationSink;

use super::classifier;
use super::{SeenTrades, SourceError, TradeSource, WalletAgeTracker};
use super::MarketMetadata;

/// Backoff never multiplies past this, independent of the cap.
const MAX_BACKOFF_DOUBLINGS: u32 = 6;

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub poll_interval: StdDuration,
    /// Ceiling for the exponential backoff after consecutive fetch failures.
    pub max_backoff: StdDuration,
    pub fetch_limit: u32,
    pub min_trade_amount: Decimal,
    pub lookback: Duration,
    pub execution_enabled: bool,
}

/// Counters for one completed poll cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleStats {
    pub fetched: usize,
    pub skipped_seen: usize,
    pub signals: usize,
}

/// The signal-detection pipeline: trade source, metadata lookup, first-seen
/// tracking, dedup, classification, and sink dispatch.
///
/// All mutable state (the wallet tracker and seen-set) is owned here and only
/// touched from `run_cycle`, which runs one cycle fully to completion before
/// the next starts. No locking needed.
pub struct SignalPipeline<S, M> {
    source: S,
    metadata: M,
    notifiers: Vec<Arc<dyn NotificationSink>>,
    executor: Arc<dyn ExecutionSink>,
    tracker: WalletAgeTracker,
    seen: SeenTrades,
    config: PollerConfig,
}

impl<S: TradeSource, M: MarketMetadata> SignalPipeline<S, M> {
    pub fn new(
        source: S,
        metadata: M,
        notifiers: Vec<Arc<dyn NotificationSink>>,
        executor: Arc<dyn ExecutionSink>,
        config: PollerConfig,
    ) -> Self {
        Self {
            source,
            metadata,
            notifiers,
            executor,
            tracker: WalletAgeTracker::new(),
            seen: SeenTrades::new(),
            config,
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    pub fn tracker(&self) -> &WalletAgeTracker {
        &self.tracker
    }

    /// Run one fetch-process cycle.
    ///
    /// Trades are processed oldest-first regardless of feed order, so a
    /// wallet's first-seen timestamp is always established by its earliest
    /// trade in the batch before any later trade of the same wallet is
    /// measured against it. Each unseen trade is observed, deduplicated and
    /// classified; qualifying signals go to every notifier and, when
    /// execution is enabled, to the executor. Executor failures are logged
    /// and do not stop the cycle.
    pub async fn run_cycle(&mut self, now: DateTime<Utc>) -> Result<CycleStats, SourceError> {
        let mut trades = self.source.fetch_recent_trades(self.config.fetch_limit).await?;
        trades.sort_by_key(|t| t.timestamp);

        let mut stats = CycleStats {
            fetched: trades.len(),
            ..CycleStats::default()
        };

        for trade in &trades {
            // First-seen must be recorded even for trades that end up
            // deduplicated or below threshold.
            let first_seen = self.tracker.observe(&trade.wallet, trade.timestamp).first_seen;

            if !self.seen.mark_and_check(&trade.trade_id) {
                stats.skipped_seen += 1;
                continue;
            }

            let wallet_is_new = self.tracker.is_new(&trade.wallet, now, self.config.lookback);
            let wallet_age = now - first_seen;

            let signal = classifier::classify(
                trade,
                wallet_is_new,
                self.config.min_trade_amount,
                wallet_age,
                &self.metadata,
                now,
            )
            .await;

            let Some(signal) = signal else { continue };

            tracing::info!(
                wallet = %signal.trade.wallet,
                market = %signal.trade.market_id,
                notional = %signal.trade.notional,
                wallet_age_mins = wallet_age.num_minutes(),
                "New-wallet trade qualified"
            );

            for notifier in &self.notifiers {
                notifier.notify(&signal).await;
            }

            if self.config.execution_enabled {
                if let Err(e) = self.executor.execute(&signal).await {
                    tracing::error!(
                        error = %e,
                        wallet = %signal.trade.wallet,
                        market = %signal.trade.market_id,
                        "Execution failed, continuing"
                    );
                }
            }

            stats.signals += 1;
        }

        Ok(stats)
    }
}

/// Delay before the next cycle after `failures` consecutive fetch errors.
/// Zero failures means the normal interval; each failure doubles it, capped.
fn backoff_delay(base: StdDuration, failures: u32, cap: StdDuration) -> StdDuration {
    if failures == 0 {
        return base;
    }
    let factor = 1u32 << failures.min(MAX_BACKOFF_DOUBLINGS);
    base.saturating_mul(factor).min(cap)
}

/// Main loop: fetch-process-sleep until the shutdown flag flips.
///
/// Transient source errors never terminate the loop; they are logged and the
/// interval backs off exponentially until a cycle succeeds again. The
/// shutdown flag is checked between cycles, never mid-fetch.
pub async fn run_poller<S: TradeSource, M: MarketMetadata>(
    mut pipeline: SignalPipeline<S, M>,
    mut shutdown: watch::Receiver<bool>,
) {
    tracing::info!(
        min_trade_amount = %pipeline.config.min_trade_amount,
        lookback_hours = pipeline.config.lookback.num_hours(),
        poll_interval_secs = pipeline.config.poll_interval.as_secs(),
        execution_enabled = pipeline.config.execution_enabled,
        "Copy-trade signal poller started"
    );

    let mut consecutive_failures: u32 = 0;

    loop {
        if *shutdown.borrow() {
            break;
        }

        let delay = match pipeline.run_cycle(Utc::now()).await {
            Ok(stats) => {
                consecutive_failures = 0;
                tracing::info!(
                    fetched = stats.fetched,
                    skipped_seen = stats.skipped_seen,
                    signals = stats.signals,
                    wallets_tracked = pipeline.tracker.len(),
                    "Poll cycle complete"
                );
                pipeline.config.poll_interval
            }
            Err(e) => {
                consecutive_failures += 1;
                let delay = backoff_delay(
                    pipeline.config.poll_interval,
                    consecutive_failures,
                    pipeline.config.max_backoff,
                );
                tracing::warn!(
                    error = %e,
                    consecutive_failures,
                    retry_in_secs = delay.as_secs(),
                    "Fetch failed, backing off"
                );
                delay
            }
        };

        tokio::select! {
            _ = sleep(delay) => {}
            changed = shutdown.changed() => {
                // Sender gone means no stop signal can ever arrive
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    tracing::info!("Copy-trade signal poller stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_delay_doubles_per_failure() {
        let base = StdDuration::from_secs(60);
        let cap = StdDuration::from_secs(600);

        assert_eq!(backoff_delay(base, 0, cap), StdDuration::from_secs(60));
        assert_eq!(backoff_delay(base, 1, cap), StdDuration::from_secs(120));
        assert_eq!(backoff_delay(base, 2, cap), StdDuration::from_secs(240));
        assert_eq!(backoff_delay(base, 3, cap), StdDuration::from_secs(480));
    }

    #[test]
    fn test_backoff_delay_caps() {
        let base = StdDuration::from_secs(60);
        let cap = StdDuration::from_secs(300);

        assert_eq!(backoff_delay(base, 4, cap), cap);
        // Many failures never overflow the multiplier
        assert_eq!(backoff_delay(base, 40, cap), cap);
    }
}
