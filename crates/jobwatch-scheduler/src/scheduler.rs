//! Interval-driven batch scheduler.
//!
//! One batch runs at a time. The round-robin cursor lives inside the
//! single-flight mutex, so whoever holds the guard is the only writer of the
//! cursor and of the batch log entry that follows.

use crate::cursor::RoundRobinCursor;
use crate::error::{Result, SchedulerError};
use jobwatch_cache::{BatchStatus, JobCache};
use jobwatch_core::SchedulerConfig;
use jobwatch_scanner::{BatchPipeline, BatchReport};
use jobwatch_sources::{Source, SourceRegistry};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

const INTERRUPTED: &str = "interrupted by shutdown";

/// Whether a batch is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    /// Waiting for the next tick or trigger
    Idle,
    /// Processing a batch
    Running,
}

/// Snapshot for the operational surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStatus {
    /// Current state
    pub state: SchedulerState,
    /// Registry index the next batch starts at
    pub next_index: usize,
    /// Registry length
    pub sources: usize,
    /// Sources per batch
    pub batch_size: usize,
    /// Seconds between scheduled batches
    pub interval_secs: u64,
    /// Whether the AI backend is configured
    pub ai_available: bool,
}

/// Exclusive right to run one batch.
struct Claim {
    cursor: OwnedMutexGuard<RoundRobinCursor>,
    pipeline: Arc<BatchPipeline>,
}

/// Drives the batch pipeline over the registry on a fixed interval.
pub struct BatchScheduler {
    registry: SourceRegistry,
    pipeline: Option<Arc<BatchPipeline>>,
    cache: JobCache,
    slot: Arc<Mutex<RoundRobinCursor>>,
    next_index: AtomicUsize,
    batch_size: usize,
    interval: Duration,
    cancel: CancellationToken,
}

impl BatchScheduler {
    /// Create a scheduler. A `None` pipeline means the AI backend failed to
    /// initialise; every batch is then logged as failed.
    #[must_use]
    pub fn new(
        registry: SourceRegistry,
        pipeline: Option<BatchPipeline>,
        cache: JobCache,
        config: &SchedulerConfig,
    ) -> Self {
        let cursor = RoundRobinCursor::new(registry.len(), config.batch_size);
        Self {
            registry,
            pipeline: pipeline.map(Arc::new),
            cache,
            slot: Arc::new(Mutex::new(cursor)),
            next_index: AtomicUsize::new(0),
            batch_size: config.batch_size,
            interval: config.interval(),
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned shutdown token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops the loop and interrupts the batch in flight.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Request shutdown.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        if self.slot.try_lock().is_ok() {
            SchedulerState::Idle
        } else {
            SchedulerState::Running
        }
    }

    /// Snapshot of state and cursor.
    #[must_use]
    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            state: self.state(),
            next_index: self.next_index.load(Ordering::Relaxed),
            sources: self.registry.len(),
            batch_size: self.batch_size,
            interval_secs: self.interval.as_secs(),
            ai_available: self.pipeline.is_some(),
        }
    }

    /// Run one batch now, unless another is in flight.
    pub async fn try_run_batch(&self) -> Result<BatchReport> {
        let claim = self.claim()?;
        Ok(self.run_claimed(claim).await)
    }

    /// Start one batch in the background, unless another is in flight.
    ///
    /// The single-flight guard is taken before this returns, so a second
    /// call made right after gets [`SchedulerError::Busy`].
    pub fn trigger(self: &Arc<Self>) -> Result<JoinHandle<BatchReport>> {
        let claim = self.claim()?;
        let this = Arc::clone(self);
        info!("manual batch triggered");
        Ok(tokio::spawn(async move { this.run_claimed(claim).await }))
    }

    /// Run batches on the configured interval until shutdown.
    ///
    /// The first batch starts immediately. A tick that finds a batch in
    /// flight is skipped. On shutdown this returns only once no batch holds
    /// the single-flight guard, including one started by [`trigger`].
    ///
    /// [`trigger`]: Self::trigger
    pub async fn run(&self) {
        info!(
            interval_secs = self.interval.as_secs(),
            batch_size = self.batch_size,
            sources = self.registry.len(),
            "scheduler started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => break,
                _ = ticker.tick() => match self.try_run_batch().await {
                    Ok(_) | Err(SchedulerError::AiUnavailable) => {}
                    Err(SchedulerError::Busy) => debug!("batch already running, skipping tick"),
                    Err(SchedulerError::ShuttingDown) => break,
                },
            }
        }

        if self.slot.try_lock().is_err() {
            info!("waiting for the batch in flight to stop");
        }
        let _idle = self.slot.lock().await;
        info!("scheduler stopped");
    }

    fn claim(&self) -> Result<Claim> {
        if self.cancel.is_cancelled() {
            return Err(SchedulerError::ShuttingDown);
        }

        let cursor = Arc::clone(&self.slot)
            .try_lock_owned()
            .map_err(|_| SchedulerError::Busy)?;

        let Some(pipeline) = self.pipeline.clone() else {
            error!("AI client not initialized, skipping batch");
            self.cache.append_log(
                Vec::new(),
                0,
                BatchStatus::Failed,
                Some(SchedulerError::AiUnavailable.to_string()),
            );
            return Err(SchedulerError::AiUnavailable);
        };

        Ok(Claim { cursor, pipeline })
    }

    async fn run_claimed(&self, claim: Claim) -> BatchReport {
        let Claim {
            mut cursor,
            pipeline,
        } = claim;

        let sources: Vec<Source> = cursor
            .window()
            .into_iter()
            .filter_map(|index| self.registry.get(index).cloned())
            .collect();

        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        info!(start = cursor.position(), sources = ?names, "starting batch");

        let report = pipeline.run_batch(&sources, &self.cancel).await;
        let processed: Vec<String> = report.reports.iter().map(|r| r.source.clone()).collect();

        if report.interrupted {
            cursor.advance_by(report.processed());
            self.cache.append_log(
                processed,
                report.jobs_added,
                BatchStatus::Failed,
                Some(INTERRUPTED.to_string()),
            );
        } else {
            cursor.advance();
            self.cache
                .append_log(processed, report.jobs_added, BatchStatus::Success, None);
        }
        self.next_index.store(cursor.position(), Ordering::Relaxed);

        info!(
            processed = report.processed(),
            jobs_added = report.jobs_added,
            next_index = cursor.position(),
            interrupted = report.interrupted,
            "batch complete"
        );

        report
    }
}
