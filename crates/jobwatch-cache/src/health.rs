//! Per-source extraction health.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rolling health of one source across batches.
///
/// A run that yields at least one job resets the streak; an empty or failed
/// run extends it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceHealth {
    /// Consecutive runs without any job
    pub consecutive_misses: u32,
    /// Short label of the last outcome, e.g. `found`, `parse_failed`
    pub last_outcome: Option<String>,
    /// When the source was last processed
    pub last_checked: Option<DateTime<Utc>>,
}

impl SourceHealth {
    /// Fold one run into the streak.
    pub fn record(&mut self, jobs_found: usize, outcome: &str, at: DateTime<Utc>) {
        if jobs_found > 0 {
            self.consecutive_misses = 0;
        } else {
            self.consecutive_misses = self.consecutive_misses.saturating_add(1);
        }
        self.last_outcome = Some(outcome.to_string());
        self.last_checked = Some(at);
    }

    /// Whether the streak has reached `threshold` (a zero threshold disables).
    #[must_use]
    pub fn is_degraded(&self, threshold: u32) -> bool {
        threshold > 0 && self.consecutive_misses >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streak_grows_and_resets() {
        let mut health = SourceHealth::default();
        let now = Utc::now();

        health.record(0, "no_jobs", now);
        health.record(0, "parse_failed", now);
        health.record(0, "fetch_failed", now);
        assert_eq!(health.consecutive_misses, 3);
        assert!(health.is_degraded(3));

        health.record(2, "found", now);
        assert_eq!(health.consecutive_misses, 0);
        assert!(!health.is_degraded(3));
        assert_eq!(health.last_outcome.as_deref(), Some("found"));
    }

    #[test]
    fn test_zero_threshold_never_degrades() {
        let mut health = SourceHealth::default();
        for _ in 0..10 {
            health.record(0, "no_jobs", Utc::now());
        }
        assert!(!health.is_degraded(0));
    }
}
