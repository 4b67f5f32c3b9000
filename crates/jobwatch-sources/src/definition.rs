//! Source definition types.

use crate::error::{Result, SourceError};
use jobwatch_core::JobCategory;
use serde::{Deserialize, Serialize};
use url::Url;

/// Third-party aggregator domains that must never be registered as sources.
///
/// These sites republish official notifications; only the issuing
/// organisations' own portals are polled.
pub const BLOCKLISTED_DOMAINS: &[&str] = &[
    "sarkariresult.com",
    "freejobalert.com",
    "mysarkarinaukri.com",
    "sarkarinaukri.com",
    "govtjobs.co.in",
    "jagranjosh.com",
];

/// One external recruitment website polled by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Display name, also the cache key
    pub name: String,
    /// Page fetched on every visit
    pub base_url: Url,
    /// Category attached to every job extracted from this source
    pub category: JobCategory,
}

impl Source {
    /// Build a source from a URL string.
    ///
    /// # Errors
    /// Returns error if the URL cannot be parsed or the source fails validation.
    pub fn new(name: impl Into<String>, base_url: &str, category: JobCategory) -> Result<Self> {
        let name = name.into();
        let base_url = Url::parse(base_url).map_err(|e| SourceError::ValidationError {
            name: name.clone(),
            reason: format!("invalid URL '{base_url}': {e}"),
        })?;

        let source = Self {
            name,
            base_url,
            category,
        };
        source.validate()?;
        Ok(source)
    }

    /// Validate the definition.
    ///
    /// # Errors
    /// Returns error if the name is blank, the URL is not http(s) with a host,
    /// or the host is a blocklisted aggregator.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SourceError::ValidationError {
                name: self.name.clone(),
                reason: "source name cannot be empty".to_string(),
            });
        }

        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(SourceError::ValidationError {
                name: self.name.clone(),
                reason: format!("unsupported URL scheme: {}", self.base_url.scheme()),
            });
        }

        if self.base_url.host_str().is_none() {
            return Err(SourceError::ValidationError {
                name: self.name.clone(),
                reason: "source URL has no host".to_string(),
            });
        }

        if is_blocklisted(&self.base_url) {
            return Err(SourceError::ValidationError {
                name: self.name.clone(),
                reason: format!("{} is a blocklisted aggregator", self.base_url),
            });
        }

        Ok(())
    }
}

/// Check whether a URL's host is (or is a subdomain of) a blocklisted aggregator.
#[must_use]
pub fn is_blocklisted(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();

    BLOCKLISTED_DOMAINS.iter().any(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_new_valid() {
        let source = Source::new("SSC", "https://www.ssc.nic.in", JobCategory::CentralGovernment)
            .expect("valid source");
        assert_eq!(source.base_url.host_str(), Some("www.ssc.nic.in"));
    }

    #[test]
    fn test_source_rejects_bad_url() {
        let err = Source::new("Broken", "not a url", JobCategory::Banking).unwrap_err();
        assert!(matches!(err, SourceError::ValidationError { .. }));
    }

    #[test]
    fn test_source_rejects_non_http_scheme() {
        let err = Source::new("Ftp", "ftp://files.gov.in", JobCategory::Banking).unwrap_err();
        assert!(err.to_string().contains("unsupported URL scheme"));
    }

    #[test]
    fn test_source_rejects_blank_name() {
        let err = Source::new("  ", "https://www.ibps.in", JobCategory::Banking).unwrap_err();
        assert!(err.to_string().contains("name cannot be empty"));
    }

    #[test]
    fn test_blocklist_matches_domain_and_subdomains() {
        let url = Url::parse("https://www.sarkariresult.com/latest").expect("valid url");
        assert!(is_blocklisted(&url));

        let url = Url::parse("https://freejobalert.com").expect("valid url");
        assert!(is_blocklisted(&url));

        // Suffix match must fall on a label boundary
        let url = Url::parse("https://notsarkariresult.com").expect("valid url");
        assert!(!is_blocklisted(&url));

        let url = Url::parse("https://www.upsc.gov.in").expect("valid url");
        assert!(!is_blocklisted(&url));
    }

    #[test]
    fn test_source_rejects_blocklisted_aggregator() {
        let err = Source::new(
            "Aggregator",
            "https://www.jagranjosh.com/jobs",
            JobCategory::CentralGovernment,
        )
        .unwrap_err();
        assert!(err.to_string().contains("blocklisted"));
    }
}
