use jobwatch_llm::LlmError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("AI request for {source_name} timed out after {timeout:?}")]
    ExtractionTimeout {
        source_name: String,
        timeout: Duration,
    },

    #[error("AI backend error: {0}")]
    Llm(#[from] LlmError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
