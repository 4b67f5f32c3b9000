//! Page fetching for recruitment sites.
//!
//! Provides retrying HTTP retrieval with user-agent rotation
//! and fail-open robots.txt checks.

pub mod error;
pub mod fetcher;
pub mod robots;
pub mod user_agent;

pub use error::{FetchError, Result};
pub use fetcher::{backoff_delay, robots_url, FetchSettings, HttpFetcher, PageFetcher};
pub use robots::RobotsTxt;
pub use user_agent::UserAgentPool;
