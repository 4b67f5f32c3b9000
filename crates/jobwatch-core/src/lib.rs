//! Jobwatch Core - Foundation crate for the job discovery pipeline.
//!
//! This crate provides the types shared by every pipeline stage, the central
//! error type, and TOML configuration loading.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with platform paths and env overrides
//! - [`types`] - Shared domain types (`JobCategory`, `JobRecord`)
//!
//! # Example
//!
//! ```rust
//! use jobwatch_core::{AppConfig, JobCategory};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.scheduler.batch_size, 5);
//!
//! let category: JobCategory = "Banking".parse().unwrap();
//! assert_eq!(category, JobCategory::Banking);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, ExtractionConfig, FetchConfig, LlmConfig, SchedulerConfig, ServerConfig,
    SourcesConfig, StorageConfig,
};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::{JobCategory, JobRecord};
