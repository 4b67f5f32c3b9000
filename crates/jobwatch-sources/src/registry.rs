//! Ordered, immutable registry of sources.

use crate::{
    builtin::BUILTIN_SOURCES,
    definition::Source,
    error::{Result, SourceError},
    loader::SourceLoader,
};
use jobwatch_core::SourcesConfig;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// The static list of sources, cycled through by index.
///
/// Cloning is cheap; every clone shares the same list.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Arc<[Source]>,
}

impl SourceRegistry {
    /// Build a registry from an ordered list of sources.
    ///
    /// # Errors
    /// Returns error if the list is empty, a name repeats, or a source fails validation.
    pub fn new(sources: Vec<Source>) -> Result<Self> {
        if sources.is_empty() {
            return Err(SourceError::Empty);
        }

        let mut seen = HashSet::new();
        for source in &sources {
            source.validate()?;
            if !seen.insert(source.name.as_str()) {
                return Err(SourceError::Duplicate {
                    name: source.name.clone(),
                });
            }
        }

        Ok(Self {
            sources: sources.into(),
        })
    }

    /// The built-in list of central government recruitment portals.
    #[must_use]
    pub fn builtin() -> Self {
        let sources = BUILTIN_SOURCES
            .iter()
            .filter_map(|(name, url, category)| Source::new(*name, url, *category).ok())
            .collect::<Vec<_>>();

        Self {
            sources: sources.into(),
        }
    }

    /// Build the registry described by configuration.
    ///
    /// Uses the configured source file when present, otherwise the built-in list.
    ///
    /// # Errors
    /// Returns error if the configured file cannot be loaded.
    pub fn from_config(config: &SourcesConfig) -> Result<Self> {
        let registry = match &config.file {
            Some(path) => Self::new(SourceLoader::new(path).load_all()?)?,
            None => Self::builtin(),
        };

        info!(count = registry.len(), "source registry ready");
        Ok(registry)
    }

    /// Get a source by position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Source> {
        self.sources.get(index)
    }

    /// Get a source by name.
    ///
    /// # Errors
    /// Returns error if no source has that name.
    pub fn get_by_name(&self, name: &str) -> Result<&Source> {
        self.sources
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| SourceError::NotFound {
                name: name.to_string(),
            })
    }

    /// Number of sources. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Always false; an empty registry cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Iterate sources in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter()
    }
}
