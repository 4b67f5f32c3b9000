//! Per-source and per-batch results.

use serde::Serialize;

/// What happened to one source in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SourceOutcome {
    /// robots.txt disallowed the page
    Blocked,
    /// The page could not be fetched after all attempts
    FetchFailed {
        /// Last fetch error
        error: String,
    },
    /// The page was fetched and handed to the extractor
    Extracted {
        /// Extraction status label
        status: &'static str,
        /// Records produced by extraction
        found: usize,
        /// Records newly persisted
        saved: usize,
    },
}

impl SourceOutcome {
    /// Short label used in health reporting.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Blocked => "blocked",
            Self::FetchFailed { .. } => "fetch_failed",
            Self::Extracted { status, .. } => status,
        }
    }

    /// Records newly persisted for this source.
    #[must_use]
    pub fn saved(&self) -> usize {
        match self {
            Self::Extracted { saved, .. } => *saved,
            _ => 0,
        }
    }
}

/// Result of processing one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    /// Source name
    pub source: String,
    /// What happened
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

/// Result of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Names of every source in the batch window, in order
    pub sources: Vec<String>,
    /// Reports for the sources actually processed
    pub reports: Vec<SourceReport>,
    /// Records newly persisted across the batch
    pub jobs_added: usize,
    /// Whether shutdown stopped the batch early
    pub interrupted: bool,
}

impl BatchReport {
    /// Number of sources processed before the batch ended.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.reports.len()
    }
}
