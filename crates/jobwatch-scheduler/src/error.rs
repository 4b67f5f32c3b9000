//! Scheduler error types.

use thiserror::Error;

/// Reasons a batch could not start.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// Another batch holds the single-flight guard.
    #[error("a batch is already running")]
    Busy,

    /// Shutdown has been requested.
    #[error("scheduler is shutting down")]
    ShuttingDown,

    /// The AI backend failed to initialise at startup.
    #[error("AI client not initialized")]
    AiUnavailable,
}

/// Result type for scheduler operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;
