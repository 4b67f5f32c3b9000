//! Jobwatch Database Layer
//!
//! Provides `SQLite` storage for discovered job postings. Uses `SQLx` with
//! embedded migrations; a unique key on `(title, company, deadline)` turns
//! re-scraped postings into `DatabaseError::Duplicate` instead of new rows.
//!
//! # Example
//!
//! ```ignore
//! use jobwatch_db::{Database, JobQuery, jobs};
//!
//! let db = Database::open("jobs.db").await?;
//! let banking = jobs::search_jobs(db.pool(), &JobQuery::default()).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod connection;
pub mod error;
pub mod jobs;
pub mod migrations;
pub mod sink;

// Re-export commonly used types
pub use connection::Database;
pub use error::{DatabaseError, Result};
pub use jobs::{JobQuery, StoredJob};
pub use sink::JobSink;
