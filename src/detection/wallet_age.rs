use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

/// First observation of a wallet by this process.
///
/// `first_seen` is fixed at creation and never moves. This is
/// observation-relative: the bot cannot see trades made before it started
/// watching, so "first seen" means first seen by this process, not the
/// wallet's first trade on the venue.
#[derive(Debug, Clone)]
pub struct WalletRecord {
    pub wallet: String,
    pub first_seen: DateTime<Utc>,
}

/// In-memory first-seen index for every wallet that has appeared in the feed.
///
/// Grows for the process lifetime; there is no eviction. Owned by the polling
/// loop, which is the only writer.
#[derive(Debug, Default)]
pub struct WalletAgeTracker {
    records: HashMap<String, WalletRecord>,
}

impl WalletAgeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a wallet sighting. The first call for a wallet creates its
    /// record with `first_seen = timestamp`; later calls return the existing
    /// record unchanged, whatever timestamp they carry.
    pub fn observe(&mut self, wallet: &str, timestamp: DateTime<Utc>) -> &WalletRecord {
        self.records
            .entry(wallet.to_string())
            .or_insert_with(|| WalletRecord {
                wallet: wallet.to_string(),
                first_seen: timestamp,
            })
    }

    /// True iff the wallet has been observed and its first sighting falls
    /// within `lookback` of `now`. An unknown wallet is never "new": without
    /// a baseline there is nothing to assert novelty against.
    pub fn is_new(&self, wallet: &str, now: DateTime<Utc>, lookback: Duration) -> bool {
        match self.records.get(wallet) {
            Some(record) => now - record.first_seen <= lookback,
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(offset_hours: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + offset_hours * 3600, 0).unwrap()
    }

    #[test]
    fn test_observe_creates_record_once() {
        let mut tracker = WalletAgeTracker::new();

        let first = tracker.observe("0xaaa", ts(0)).first_seen;
        assert_eq!(first, ts(0));

        // A later sighting does not move first_seen
        let again = tracker.observe("0xaaa", ts(5)).first_seen;
        assert_eq!(again, ts(0));

        // Neither does an earlier one
        let earlier = tracker.observe("0xaaa", ts(-3)).first_seen;
        assert_eq!(earlier, ts(0));

        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_is_new_within_lookback() {
        let mut tracker = WalletAgeTracker::new();
        tracker.observe("0xaaa", ts(0));

        let lookback = Duration::hours(24);
        assert!(tracker.is_new("0xaaa", ts(1), lookback));
        // Exactly at the boundary still counts
        assert!(tracker.is_new("0xaaa", ts(24), lookback));
        // One hour past the window does not
        assert!(!tracker.is_new("0xaaa", ts(25), lookback));
    }

    #[test]
    fn test_unknown_wallet_is_not_new() {
        let tracker = WalletAgeTracker::new();
        assert!(!tracker.is_new("0xbbb", ts(0), Duration::hours(24)));
    }
}
