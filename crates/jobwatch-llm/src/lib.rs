//! Jobwatch LLM - completion backend used to extract job postings.
//!
//! This crate provides a small provider abstraction over generative-AI
//! backends and a Google Gemini implementation of it.
//!
//! # Example
//!
//! ```rust,no_run
//! use jobwatch_llm::{CompletionRequest, GeminiProvider, LlmProvider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gemini = GeminiProvider::new("api-key")?;
//!
//! let request = CompletionRequest::new("Return [] as JSON.").with_temperature(0.0);
//! let response = gemini.complete(request).await?;
//!
//! println!("Response: {}", response.content);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod provider;
pub mod providers;

// Re-export commonly used types
pub use error::{LlmError, Result};
pub use provider::{
    CompletionRequest, CompletionResponse, InlineImage, LlmProvider, Message, Role, Usage,
};
pub use providers::GeminiProvider;
