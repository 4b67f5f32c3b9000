//! Batch pipeline for processing sources.
//!
//! For each source, in order: robots.txt check, fetch, extract, cache write,
//! then persist every record. A failing source produces a [`SourceOutcome`]
//! and the batch moves on to the next one.

use crate::extractor::Extractor;
use crate::outcome::{BatchReport, SourceOutcome, SourceReport};
use jobwatch_cache::JobCache;
use jobwatch_core::JobRecord;
use jobwatch_db::JobSink;
use jobwatch_fetch::PageFetcher;
use jobwatch_sources::Source;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Fetch, extract and persist pipeline shared by scheduled and manual runs.
pub struct BatchPipeline {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Extractor,
    sink: Arc<dyn JobSink>,
    cache: JobCache,
    respect_robots: bool,
}

impl BatchPipeline {
    /// Create a pipeline writing to `cache` and `sink`.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: Extractor,
        sink: Arc<dyn JobSink>,
        cache: JobCache,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            sink,
            cache,
            respect_robots: true,
        }
    }

    /// Enable or disable the robots.txt check.
    #[must_use]
    pub fn with_robots_check(mut self, enabled: bool) -> Self {
        self.respect_robots = enabled;
        self
    }

    /// Process `sources` sequentially, stopping early if `cancel` fires.
    ///
    /// Cancellation is only observed between sources; the source in flight
    /// runs to completion or to its own timeouts.
    pub async fn run_batch(&self, sources: &[Source], cancel: &CancellationToken) -> BatchReport {
        let mut report = BatchReport {
            sources: sources.iter().map(|s| s.name.clone()).collect(),
            ..BatchReport::default()
        };

        for source in sources {
            if cancel.is_cancelled() {
                info!(
                    processed = report.processed(),
                    remaining = sources.len() - report.processed(),
                    "shutdown requested, stopping batch"
                );
                report.interrupted = true;
                break;
            }

            let source_report = self.process_source(source).await;
            report.jobs_added += source_report.outcome.saved();
            report.reports.push(source_report);
        }

        report
    }

    /// Process one source end to end.
    pub async fn process_source(&self, source: &Source) -> SourceReport {
        let outcome = self.source_outcome(source).await;

        let found = match &outcome {
            SourceOutcome::Extracted { found, .. } => *found,
            _ => 0,
        };
        self.cache.record_run(&source.name, found, outcome.label());

        SourceReport {
            source: source.name.clone(),
            outcome,
        }
    }

    async fn source_outcome(&self, source: &Source) -> SourceOutcome {
        let url = &source.base_url;

        if self.respect_robots && !self.fetcher.is_allowed(url).await {
            warn!(source = %source.name, %url, "blocked by robots.txt, skipping");
            return SourceOutcome::Blocked;
        }

        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(source = %source.name, "fetch failed: {}", e);
                return SourceOutcome::FetchFailed {
                    error: e.to_string(),
                };
            }
        };

        let status = self
            .extractor
            .extract(&html, &source.name, source.category)
            .await;
        let label = status.label();
        let definitive = status.is_definitive();
        let jobs = status.into_jobs();

        // Failed extractions keep the previous entry
        if definitive {
            self.cache.put(&source.name, jobs.clone());
        }

        let found = jobs.len();
        let saved = self.persist(&source.name, &jobs).await;

        info!(source = %source.name, found, saved, status = label, "source processed");

        SourceOutcome::Extracted {
            status: label,
            found,
            saved,
        }
    }

    async fn persist(&self, source_name: &str, jobs: &[JobRecord]) -> usize {
        let mut saved = 0;
        for job in jobs {
            match self.sink.create_job(job).await {
                Ok(_) => saved += 1,
                Err(e) if e.is_duplicate() => {
                    debug!(source = source_name, title = %job.title, "job already stored");
                }
                Err(e) => {
                    warn!(source = source_name, title = %job.title, "failed to store job: {}", e);
                }
            }
        }
        saved
    }
}
