//! Retrying HTTP page fetcher.

use crate::error::{FetchError, Result};
use crate::robots::RobotsTxt;
use crate::user_agent::UserAgentPool;
use async_trait::async_trait;
use jobwatch_core::FetchConfig;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, PRAGMA,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use std::time::Duration;
use url::Url;

/// Something that can retrieve a page and answer robots.txt questions.
///
/// The scanner depends on this trait rather than on `HttpFetcher` so
/// tests can substitute canned pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the body of `url`, retrying transient failures.
    async fn fetch(&self, url: &Url) -> Result<String>;

    /// Whether the site's robots.txt permits fetching `url`.
    ///
    /// Must fail open: any problem retrieving or reading robots.txt
    /// yields `true`.
    async fn is_allowed(&self, url: &Url) -> bool;
}

/// Tunables for `HttpFetcher`.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Attempts before giving up (at least one is always made)
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for each subsequent retry
    pub base_delay: Duration,
    /// Agent token evaluated against robots.txt groups
    pub robots_agent: String,
}

impl From<&FetchConfig> for FetchSettings {
    fn from(config: &FetchConfig) -> Self {
        Self {
            timeout: config.timeout(),
            max_attempts: config.max_attempts,
            base_delay: config.base_delay(),
            robots_agent: config.robots_agent.clone(),
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

/// Delay to wait before retry number `retry` (1-based).
///
/// `base * 2^(retry - 1)`, so with a 2s base the waits are 2s, 4s, 8s...
#[must_use]
pub fn backoff_delay(base: Duration, retry: u32) -> Duration {
    let exponent = retry.saturating_sub(1).min(16);
    base.saturating_mul(1u32 << exponent)
}

/// `reqwest`-backed page fetcher with browser-like headers.
pub struct HttpFetcher {
    client: reqwest::Client,
    agents: UserAgentPool,
    settings: FetchSettings,
}

impl HttpFetcher {
    /// Create a fetcher from the `[fetch]` configuration section.
    ///
    /// # Errors
    /// Returns `FetchError::Client` if the HTTP client cannot be built.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Self::with_settings(FetchSettings::from(config))
    }

    /// Create a fetcher with explicit settings.
    ///
    /// # Errors
    /// Returns `FetchError::Client` if the HTTP client cannot be built.
    pub fn with_settings(settings: FetchSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(browser_headers())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            agents: UserAgentPool::default(),
            settings,
        })
    }

    /// Replace the user-agent pool.
    #[must_use]
    pub fn with_user_agents(mut self, agents: UserAgentPool) -> Self {
        self.agents = agents;
        self
    }

    async fn fetch_once(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, self.agents.random())
            .timeout(self.settings.timeout)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_reqwest_error(&e))?;

        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }

        Ok(body)
    }

    fn map_reqwest_error(&self, e: &reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                millis: self.settings.timeout.as_millis(),
            }
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let max_attempts = self.settings.max_attempts.max(1);
        let mut last_error = FetchError::EmptyBody;

        for attempt in 1..=max_attempts {
            match self.fetch_once(url).await {
                Ok(body) => {
                    tracing::debug!(%url, attempt, bytes = body.len(), "Fetched page");
                    return Ok(body);
                }
                Err(e) => {
                    if attempt < max_attempts {
                        let delay = backoff_delay(self.settings.base_delay, attempt);
                        tracing::warn!(
                            "Fetch failed for {} (attempt {}/{}): {}, retrying in {:?}",
                            url,
                            attempt,
                            max_attempts,
                            e,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        tracing::warn!(
                            "Fetch failed for {} (attempt {}/{}): {}",
                            url,
                            attempt,
                            max_attempts,
                            e
                        );
                    }
                    last_error = e;
                }
            }
        }

        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts: max_attempts,
            last_error: Box::new(last_error),
        })
    }

    async fn is_allowed(&self, url: &Url) -> bool {
        let Some(robots_url) = robots_url(url) else {
            return true;
        };

        // Single attempt; robots.txt problems never block a fetch
        let body = match self.fetch_once(&robots_url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("No usable robots.txt at {}: {}", robots_url, e);
                return true;
            }
        };

        let target = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let robots = RobotsTxt::parse(&body);
        let allowed = robots.is_allowed(&self.settings.robots_agent, &target);
        if !allowed {
            tracing::info!("robots.txt at {} disallows {}", robots_url, target);
        }
        allowed
    }
}

/// `{scheme}://{host}[:port]/robots.txt` for `url`, if it has an origin.
#[must_use]
pub fn robots_url(url: &Url) -> Option<Url> {
    if !url.has_host() {
        return None;
    }
    let mut robots = url.clone();
    robots.set_path("/robots.txt");
    robots.set_query(None);
    robots.set_fragment(None);
    Some(robots)
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert("DNT", HeaderValue::from_static("1"));
    headers
}
