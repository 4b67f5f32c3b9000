//! AI-backed job extraction.

use crate::error::{Result, ScanError};
use crate::parser::{parse_jobs, ParseOutcome, ParseRules};
use crate::prompts::{extraction_prompt, truncate_html};
use chrono::Utc;
use jobwatch_core::{ExtractionConfig, JobCategory, JobRecord};
use jobwatch_llm::{CompletionRequest, LlmProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// What an extraction attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStatus {
    /// Validated records, at most the per-source cap
    Found(Vec<JobRecord>),
    /// The model answered with no usable postings
    NoJobs,
    /// The model answered but not with a parseable array
    ParseFailed(String),
    /// The backend call failed or timed out
    BackendFailed(String),
}

impl ExtractionStatus {
    /// Short label used in health reporting.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::NoJobs => "no_jobs",
            Self::ParseFailed(_) => "parse_failed",
            Self::BackendFailed(_) => "backend_failed",
        }
    }

    /// Whether the result is a definitive answer about the page
    /// (jobs found, or a clean empty answer).
    #[must_use]
    pub fn is_definitive(&self) -> bool {
        matches!(self, Self::Found(_) | Self::NoJobs)
    }

    /// Extracted records, empty unless `Found`.
    #[must_use]
    pub fn into_jobs(self) -> Vec<JobRecord> {
        match self {
            Self::Found(jobs) => jobs,
            _ => Vec::new(),
        }
    }
}

/// Turns raw HTML into job records through a completion backend.
pub struct Extractor {
    provider: Arc<dyn LlmProvider>,
    max_html_chars: usize,
    rules: ParseRules,
    timeout: Duration,
}

impl Extractor {
    /// Create an extractor with the given limits and per-request timeout.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, config: &ExtractionConfig, timeout: Duration) -> Self {
        Self {
            provider,
            max_html_chars: config.max_html_chars,
            rules: ParseRules {
                max_jobs: config.max_jobs_per_source,
                default_deadline_days: config.default_deadline_days,
            },
            timeout,
        }
    }

    /// Extract job records from `html`. Never fails: backend and parsing
    /// problems are reported through the returned status.
    pub async fn extract(
        &self,
        html: &str,
        source_name: &str,
        category: JobCategory,
    ) -> ExtractionStatus {
        let prefix = truncate_html(html, self.max_html_chars);
        debug!(
            source = source_name,
            bytes = prefix.len(),
            model = self.provider.model_name(),
            "sending page to AI backend"
        );

        let response = match self.request(prefix, source_name).await {
            Ok(text) => text,
            Err(e) => {
                error!(source = source_name, "AI extraction failed: {}", e);
                return ExtractionStatus::BackendFailed(e.to_string());
            }
        };

        let today = Utc::now().date_naive();
        match parse_jobs(&response, source_name, category, self.rules, today) {
            ParseOutcome::Jobs(jobs) => {
                info!(source = source_name, count = jobs.len(), "extracted jobs");
                ExtractionStatus::Found(jobs)
            }
            ParseOutcome::Empty => {
                info!(source = source_name, "no jobs found in page");
                ExtractionStatus::NoJobs
            }
            ParseOutcome::NoArray => {
                warn!(source = source_name, "no JSON array in AI response");
                ExtractionStatus::ParseFailed("no JSON array in response".to_string())
            }
            ParseOutcome::InvalidJson(reason) => {
                warn!(source = source_name, "failed to parse AI response: {}", reason);
                ExtractionStatus::ParseFailed(reason)
            }
        }
    }

    async fn request(&self, html: &str, source_name: &str) -> Result<String> {
        let request = CompletionRequest::new(extraction_prompt(html)).with_temperature(0.0);

        let response = tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
            .map_err(|_| ScanError::ExtractionTimeout {
                source_name: source_name.to_string(),
                timeout: self.timeout,
            })??;

        Ok(response.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use jobwatch_llm::{CompletionResponse, LlmError};
    use std::sync::Mutex;

    struct CannedProvider {
        reply: std::result::Result<String, u16>,
        delay: Duration,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                delay: Duration::ZERO,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> jobwatch_llm::Result<CompletionResponse> {
            self.prompts
                .lock()
                .expect("prompts lock")
                .push(request.messages[0].content.clone());
            tokio::time::sleep(self.delay).await;
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    content: text.clone(),
                    model: "canned".to_string(),
                    stop_reason: None,
                    usage: None,
                }),
                Err(status) => Err(LlmError::ApiError {
                    provider: "canned".to_string(),
                    status: *status,
                    message: "boom".to_string(),
                }),
            }
        }

        fn provider_id(&self) -> &str {
            "canned"
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    fn extractor(provider: Arc<CannedProvider>) -> Extractor {
        Extractor::new(provider, &ExtractionConfig::default(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_found_jobs() {
        let provider = Arc::new(CannedProvider::replying(
            r#"[{"title":"Clerk","company":"Dept X"}]"#,
        ));
        let status = extractor(provider)
            .extract("<html></html>", "SSC", JobCategory::CentralGovernment)
            .await;

        let ExtractionStatus::Found(jobs) = status else {
            panic!("expected jobs, got {status:?}");
        };
        assert_eq!(jobs[0].title, "Clerk");
        assert_eq!(jobs[0].job_type, "Full-time");
        assert_eq!(jobs[0].salary, "Varies");
        assert_eq!(jobs[0].description, "Jobs from SSC");
        assert_eq!(jobs[0].category, JobCategory::CentralGovernment);
        let expected = Utc::now().date_naive() + chrono::Duration::days(60);
        assert!((jobs[0].deadline - expected).num_days().abs() <= 1);
    }

    #[tokio::test]
    async fn test_statuses_are_distinguished() {
        let cases = [
            ("[]", "no_jobs"),
            ("no idea", "parse_failed"),
            ("[{broken", "parse_failed"),
        ];
        for (reply, label) in cases {
            let status = extractor(Arc::new(CannedProvider::replying(reply)))
                .extract("<p>", "RBI", JobCategory::Banking)
                .await;
            assert_eq!(status.label(), label, "reply {reply:?}");
        }
    }

    #[tokio::test]
    async fn test_backend_error_is_not_raised() {
        let provider = Arc::new(CannedProvider {
            reply: Err(503),
            delay: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
        });
        let status = extractor(provider)
            .extract("<p>", "RBI", JobCategory::Banking)
            .await;

        assert!(matches!(status, ExtractionStatus::BackendFailed(_)));
        assert!(!status.is_definitive());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_backend_times_out() {
        let provider = Arc::new(CannedProvider {
            reply: Ok("[]".to_string()),
            delay: Duration::from_secs(120),
            prompts: Mutex::new(Vec::new()),
        });
        let status = extractor(provider)
            .extract("<p>", "ISRO", JobCategory::Defence)
            .await;

        let ExtractionStatus::BackendFailed(reason) = status else {
            panic!("expected backend failure, got {status:?}");
        };
        assert!(reason.contains("timed out"));
    }

    #[tokio::test]
    async fn test_html_is_truncated_before_sending() {
        let provider = Arc::new(CannedProvider::replying("[]"));
        let config = ExtractionConfig {
            max_html_chars: 10,
            ..ExtractionConfig::default()
        };
        let extractor = Extractor::new(provider.clone(), &config, Duration::from_secs(5));

        let html = format!("0123456789{}", "TAIL".repeat(100));
        let status = extractor
            .extract(&html, "SSC", JobCategory::CentralGovernment)
            .await;
        assert_eq!(status.label(), "no_jobs");

        let prompts = provider.prompts.lock().expect("prompts lock");
        assert!(prompts[0].ends_with("0123456789"));
        assert!(!prompts[0].contains("TAIL"));
    }
}
