//! Bounded log of batch outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of batch entries retained.
pub const MAX_LOG_ENTRIES: usize = 50;

/// Aggregate outcome of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// The batch ran to completion
    Success,
    /// The batch was skipped or interrupted
    Failed,
}

/// One line of the batch log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeLogEntry {
    /// When the batch finished
    pub timestamp: DateTime<Utc>,
    /// Names of the sources the batch covered
    pub sources: Vec<String>,
    /// Records durably persisted by the batch
    pub jobs_added: usize,
    /// Aggregate status
    pub status: BatchStatus,
    /// Reason for a failed batch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Fixed-capacity FIFO of batch entries; the oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct ScrapeLog {
    entries: VecDeque<ScrapeLogEntry>,
    capacity: usize,
}

impl ScrapeLog {
    /// Create a log holding at most `capacity` entries (minimum one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting from the front when full.
    pub fn push(&mut self, entry: ScrapeLogEntry) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Entries in chronological order.
    #[must_use]
    pub fn entries(&self) -> Vec<ScrapeLogEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<&ScrapeLogEntry> {
        self.entries.back()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been logged yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ScrapeLog {
    fn default() -> Self {
        Self::with_capacity(MAX_LOG_ENTRIES)
    }
}
