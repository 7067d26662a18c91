//! Bounded memory of queries already reported to analytics.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

/// Remembers distinct queries for a while.
///
/// Entries expire after `ttl`; when full, the oldest entry is evicted.
#[derive(Debug)]
pub struct QueryLog {
    seen: HashMap<String, Instant>,
    max_entries: usize,
    ttl: Duration,
}

impl QueryLog {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            seen: HashMap::new(),
            max_entries: max_entries.max(1),
            ttl,
        }
    }

    /// Record `query` (trimmed). Returns `true` if it was not already remembered.
    pub fn first_seen(&mut self, query: &str) -> bool {
        let key = query.trim();
        let ttl = self.ttl;
        self.seen.retain(|_, at| at.elapsed() <= ttl);
        if self.seen.contains_key(key) {
            return false;
        }

        if self.seen.len() >= self.max_entries
            && let Some(oldest) = self
                .seen
                .iter()
                .min_by_key(|(_, at)| **at)
                .map(|(k, _)| k.clone())
        {
            self.seen.remove(&oldest);
        }

        self.seen.insert(key.to_string(), Instant::now());
        true
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
