//! The seam the pipeline persists through.

use crate::connection::Database;
use crate::error::Result;
use crate::jobs::{self, StoredJob};
use async_trait::async_trait;
use jobwatch_core::JobRecord;

/// Durable destination for extracted job records.
///
/// Implementations must reject a logically duplicate job with
/// `DatabaseError::Duplicate` rather than storing it twice; callers treat
/// that error as "already stored" and move on.
#[async_trait]
pub trait JobSink: Send + Sync {
    /// Persist one record.
    async fn create_job(&self, record: &JobRecord) -> Result<StoredJob>;
}

#[async_trait]
impl JobSink for Database {
    async fn create_job(&self, record: &JobRecord) -> Result<StoredJob> {
        jobs::create_job(self.pool(), record).await
    }
}
