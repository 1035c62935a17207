use std::collections::HashSet;

/// Trade ids already run through classification.
///
/// Poll windows overlap, so the same trade routinely shows up in consecutive
/// fetches; this set guarantees each trade id is classified at most once per
/// process lifetime. It never shrinks — an accepted tradeoff for a single
/// long-running process with no durable storage.
#[derive(Debug, Default)]
pub struct SeenTrades {
    ids: HashSet<String>,
}

impl SeenTrades {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time a trade id is passed (and records it),
    /// false on every subsequent call with the same id.
    pub fn mark_and_check(&mut self, trade_id: &str) -> bool {
        self.ids.insert(trade_id.to_string())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
