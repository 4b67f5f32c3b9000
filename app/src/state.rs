//! Shared state handed to every HTTP handler.

use jobwatch_cache::JobCache;
use jobwatch_db::Database;
use jobwatch_scheduler::BatchScheduler;
use std::sync::Arc;

/// Handles owned by the process and shared with the router.
#[derive(Clone)]
pub struct AppState {
    /// Cache and batch log written by the scheduler
    pub cache: JobCache,
    /// Durable job store
    pub db: Database,
    /// Scheduler, used for manual triggers and status
    pub scheduler: Arc<BatchScheduler>,
}

impl AppState {
    /// Bundle the shared handles.
    pub fn new(cache: JobCache, db: Database, scheduler: Arc<BatchScheduler>) -> Self {
        Self {
            cache,
            db,
            scheduler,
        }
    }
}
