use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Failure of a single fetch attempt, or of the whole retry cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status}")]
    Http { status: u16 },

    #[error("empty response body")]
    EmptyBody,

    #[error("request timed out after {millis}ms")]
    Timeout { millis: u128 },

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("giving up on {url} after {attempts} attempts: {last_error}")]
    Exhausted {
        url: String,
        attempts: u32,
        last_error: Box<FetchError>,
    },
}
