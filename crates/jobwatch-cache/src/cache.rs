//! Last-write-wins job cache keyed by source name.

use crate::health::SourceHealth;
use crate::log::{BatchStatus, ScrapeLog, ScrapeLogEntry};
use chrono::{DateTime, Utc};
use jobwatch_core::JobRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Records cached for one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Source the records were extracted from
    pub source: String,
    /// Records from the latest definitive extraction
    pub jobs: Vec<JobRecord>,
    /// When the entry was written
    pub timestamp: DateTime<Utc>,
}

/// Per-source summary reported by [`JobCache::stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStats {
    /// Records currently cached
    pub job_count: usize,
    /// When the cache entry was last written
    pub last_updated: Option<DateTime<Utc>>,
    /// Consecutive runs without any job
    pub consecutive_misses: u32,
    /// Short label of the last outcome
    pub last_outcome: Option<String>,
    /// Whether the miss streak reached the degraded threshold
    pub degraded: bool,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: BTreeMap<String, CacheEntry>,
    logs: ScrapeLog,
    health: BTreeMap<String, SourceHealth>,
}

/// Shared handle to the in-memory cache, batch log and source health.
///
/// Cloning is cheap; all clones observe the same state. Writers are the
/// batch pipeline and scheduler; HTTP handlers only read.
#[derive(Debug, Clone)]
pub struct JobCache {
    state: Arc<RwLock<CacheState>>,
    degraded_after: u32,
}

impl JobCache {
    /// Create an empty cache that reports a source degraded after
    /// `degraded_after` consecutive misses.
    #[must_use]
    pub fn new(degraded_after: u32) -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheState::default())),
            degraded_after,
        }
    }

    /// Replace the cached records for `source`.
    pub fn put(&self, source: &str, jobs: Vec<JobRecord>) {
        debug!(source, count = jobs.len(), "caching extracted jobs");
        let entry = CacheEntry {
            source: source.to_string(),
            jobs,
            timestamp: Utc::now(),
        };
        self.write().entries.insert(source.to_string(), entry);
    }

    /// Cached records for one source, or every cached record when `source`
    /// is `None` (grouped by source name in ascending order).
    #[must_use]
    pub fn get(&self, source: Option<&str>) -> Vec<JobRecord> {
        let state = self.read();
        match source {
            Some(name) => state
                .entries
                .get(name)
                .map(|entry| entry.jobs.clone())
                .unwrap_or_default(),
            None => state
                .entries
                .values()
                .flat_map(|entry| entry.jobs.iter().cloned())
                .collect(),
        }
    }

    /// Full cache entry for a source.
    #[must_use]
    pub fn entry(&self, source: &str) -> Option<CacheEntry> {
        self.read().entries.get(source).cloned()
    }

    /// Per-source counts, timestamps and health.
    ///
    /// Covers every source that has either a cache entry or a recorded run.
    #[must_use]
    pub fn stats(&self) -> BTreeMap<String, SourceStats> {
        let state = self.read();
        let names: BTreeSet<&String> = state.entries.keys().chain(state.health.keys()).collect();

        names
            .into_iter()
            .map(|name| {
                let entry = state.entries.get(name);
                let health = state.health.get(name).cloned().unwrap_or_default();
                let stats = SourceStats {
                    job_count: entry.map_or(0, |e| e.jobs.len()),
                    last_updated: entry.map(|e| e.timestamp),
                    consecutive_misses: health.consecutive_misses,
                    degraded: health.is_degraded(self.degraded_after),
                    last_outcome: health.last_outcome,
                };
                (name.clone(), stats)
            })
            .collect()
    }

    /// Fold one run of `source` into its health streak.
    pub fn record_run(&self, source: &str, jobs_found: usize, outcome: &str) {
        let mut state = self.write();
        let health = state.health.entry(source.to_string()).or_default();
        health.record(jobs_found, outcome, Utc::now());
        if health.is_degraded(self.degraded_after) {
            tracing::warn!(
                source,
                misses = health.consecutive_misses,
                "source degraded: no jobs in consecutive runs"
            );
        }
    }

    /// Names of sources currently considered degraded.
    #[must_use]
    pub fn degraded_sources(&self) -> Vec<String> {
        self.read()
            .health
            .iter()
            .filter(|(_, h)| h.is_degraded(self.degraded_after))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Append a batch outcome to the bounded log.
    pub fn append_log(
        &self,
        sources: Vec<String>,
        jobs_added: usize,
        status: BatchStatus,
        error: Option<String>,
    ) {
        self.write().logs.push(ScrapeLogEntry {
            timestamp: Utc::now(),
            sources,
            jobs_added,
            status,
            error,
        });
    }

    /// Logged batches, oldest first.
    #[must_use]
    pub fn logs(&self) -> Vec<ScrapeLogEntry> {
        self.read().logs.entries()
    }

    /// Drop every cached entry. Logs and health are kept.
    pub fn clear(&self) {
        self.write().entries.clear();
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for JobCache {
    fn default() -> Self {
        Self::new(3)
    }
}
