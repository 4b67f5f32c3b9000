//! Source list loading from TOML files.
//!
//! A source file replaces the built-in registry:
//!
//! ```toml
//! [[source]]
//! name = "UPSC"
//! base_url = "https://www.upsc.gov.in"
//! category = "Administrative / Civil Services"
//! ```

use crate::{
    definition::Source,
    error::{Result, SourceError},
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize)]
struct SourceFile {
    #[serde(rename = "source", default)]
    sources: Vec<Source>,
}

/// Loader for source lists stored as TOML.
pub struct SourceLoader {
    path: PathBuf,
}

impl SourceLoader {
    /// Create a loader for the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this loader reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and validate every source in the file, preserving file order.
    ///
    /// # Errors
    /// Returns error if the file can't be read, isn't valid TOML, or any
    /// source fails validation.
    pub fn load_all(&self) -> Result<Vec<Source>> {
        let contents = std::fs::read_to_string(&self.path)?;
        let sources = Self::parse(&contents, &self.path.display().to_string())?;

        info!(
            count = sources.len(),
            path = %self.path.display(),
            "loaded source definitions"
        );

        Ok(sources)
    }

    fn parse(contents: &str, origin: &str) -> Result<Vec<Source>> {
        let file: SourceFile = toml::from_str(contents).map_err(|e| SourceError::ParseError {
            path: origin.to_string(),
            source: e,
        })?;

        for source in &file.sources {
            source.validate()?;
        }

        Ok(file.sources)
    }
}
