//! Jobwatch Sources - the registry of recruitment websites the pipeline polls.
//!
//! The registry is an ordered, immutable list of [`Source`]s built once at
//! process start, either from the built-in government sources or from an
//! operator-supplied TOML file. The scheduler cycles through it by index.
//!
//! # Example
//!
//! ```rust
//! use jobwatch_sources::SourceRegistry;
//!
//! let registry = SourceRegistry::builtin();
//! let first = registry.get(0).unwrap();
//! assert_eq!(first.name, "UPSC");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod builtin;
pub mod definition;
pub mod error;
pub mod loader;
pub mod registry;

// Re-export commonly used types
pub use definition::{is_blocklisted, Source, BLOCKLISTED_DOMAINS};
pub use error::{Result, SourceError};
pub use loader::SourceLoader;
pub use registry::SourceRegistry;
