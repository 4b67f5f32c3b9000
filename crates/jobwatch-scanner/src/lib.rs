//! Jobwatch Scanner - AI job extraction and the batch pipeline.
//!
//! The [`Extractor`] sends a bounded prefix of a page to a completion backend
//! and validates the untrusted answer into [`JobRecord`](jobwatch_core::JobRecord)s.
//! The [`BatchPipeline`] drives fetch, extraction, cache writes and
//! persistence for a window of sources, one source at a time.
//!
//! # Features
//!
//! - Typed extraction status separating "no jobs" from parse and backend failures
//! - Per-request AI timeout
//! - Per-source outcomes aggregated into a [`BatchReport`]
//! - Duplicate-tolerant persistence through the [`JobSink`](jobwatch_db::JobSink) seam
//!
//! # Example
//!
//! ```rust,ignore
//! use jobwatch_scanner::{BatchPipeline, Extractor};
//!
//! let extractor = Extractor::new(provider, &config.extraction, config.llm.timeout());
//! let pipeline = BatchPipeline::new(fetcher, extractor, Arc::new(db), cache.clone());
//! let report = pipeline.run_batch(&sources, &cancel).await;
//! println!("{} jobs added", report.jobs_added);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod error;
pub mod extractor;
pub mod outcome;
pub mod parser;
pub mod pipeline;
pub mod prompts;

// Re-export commonly used types
pub use error::{Result, ScanError};
pub use extractor::{ExtractionStatus, Extractor};
pub use outcome::{BatchReport, SourceOutcome, SourceReport};
pub use parser::{parse_jobs, ParseOutcome, ParseRules};
pub use pipeline::BatchPipeline;
