//! Error types for the source registry.

use thiserror::Error;

/// Errors that can occur while building the source registry.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Source not found by name
    #[error("source not found: {name}")]
    NotFound {
        /// The source name that was looked up
        name: String,
    },

    /// Registry would contain no sources
    #[error("source registry is empty")]
    Empty,

    /// Two sources share a name
    #[error("duplicate source name: {name}")]
    Duplicate {
        /// The repeated name
        name: String,
    },

    /// Invalid source definition (validation failed)
    #[error("invalid source {name}: {reason}")]
    ValidationError {
        /// Source being validated
        name: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Failed to parse a source list TOML file
    #[error("failed to parse source file {path}: {source}")]
    ParseError {
        /// Path to the source file
        path: String,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// I/O error while reading a source file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for source registry operations.
pub type Result<T> = std::result::Result<T, SourceError>;
