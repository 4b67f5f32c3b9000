//! Jobwatch Cache - observability state for the discovery pipeline.
//!
//! Holds the most recent extraction per source (last write wins), a rolling
//! log of batch outcomes capped at [`MAX_LOG_ENTRIES`], and per-source health
//! streaks used to flag sources that keep coming back empty.
//!
//! Nothing here is persisted; durable job records live in the database.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod health;
pub mod log;

pub use cache::{CacheEntry, JobCache, SourceStats};
pub use health::SourceHealth;
pub use log::{BatchStatus, ScrapeLog, ScrapeLogEntry, MAX_LOG_ENTRIES};
