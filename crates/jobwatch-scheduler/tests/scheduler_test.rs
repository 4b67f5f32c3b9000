//! Scheduler tests over in-process fakes.
//!
//! Everything here stays inside the runtime so paused-clock tests advance
//! deterministically.

use async_trait::async_trait;
use chrono::Utc;
use jobwatch_cache::{BatchStatus, JobCache};
use jobwatch_core::{ExtractionConfig, JobCategory, JobRecord, SchedulerConfig};
use jobwatch_db::{DatabaseError, JobSink, StoredJob};
use jobwatch_fetch::{FetchError, PageFetcher};
use jobwatch_llm::{CompletionRequest, CompletionResponse, LlmProvider};
use jobwatch_scanner::{BatchPipeline, Extractor};
use jobwatch_scheduler::{BatchScheduler, SchedulerError, SchedulerState};
use jobwatch_sources::{Source, SourceRegistry};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Serves one job named after the host, optionally slowly.
struct FakeFetcher {
    delay: Duration,
    cancel_after: Option<(String, CancellationToken)>,
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &Url) -> jobwatch_fetch::Result<String> {
        tokio::time::sleep(self.delay).await;
        let host = url.host_str().ok_or(FetchError::EmptyBody)?;
        let name = host.split('.').next().unwrap_or_default().to_uppercase();
        if let Some((trigger, token)) = &self.cancel_after {
            if *trigger == name {
                token.cancel();
            }
        }
        Ok(format!(r#"[{{"title":"Officer","company":"{name}"}}]"#))
    }

    async fn is_allowed(&self, _url: &Url) -> bool {
        true
    }
}

struct EchoProvider;

#[async_trait]
impl LlmProvider for EchoProvider {
    async fn complete(&self, request: CompletionRequest) -> jobwatch_llm::Result<CompletionResponse> {
        let page = request.messages[0]
            .content
            .split_once("HTML Content:\n")
            .map_or(String::new(), |(_, html)| html.to_string());
        Ok(CompletionResponse {
            content: page,
            model: "echo".to_string(),
            stop_reason: None,
            usage: None,
        })
    }

    fn provider_id(&self) -> &str {
        "echo"
    }

    fn model_name(&self) -> &str {
        "echo"
    }
}

#[derive(Default)]
struct MemorySink {
    stored: Mutex<Vec<JobRecord>>,
}

#[async_trait]
impl JobSink for MemorySink {
    async fn create_job(&self, record: &JobRecord) -> jobwatch_db::Result<StoredJob> {
        let mut stored = self.stored.lock().unwrap();
        if stored.iter().any(|j| {
            j.title == record.title && j.company == record.company && j.deadline == record.deadline
        }) {
            return Err(DatabaseError::Duplicate {
                title: record.title.clone(),
                company: record.company.clone(),
            });
        }
        stored.push(record.clone());
        Ok(StoredJob {
            id: stored.len().to_string(),
            record: record.clone(),
            created_at: Utc::now(),
        })
    }
}

fn registry() -> SourceRegistry {
    let sources = ["A", "B", "C", "D", "E", "F", "G"]
        .iter()
        .map(|name| {
            let url = format!("https://{}.example.gov.in/", name.to_lowercase());
            Source::new(*name, &url, JobCategory::CentralGovernment).expect("valid source")
        })
        .collect();
    SourceRegistry::new(sources).expect("valid registry")
}

fn config() -> SchedulerConfig {
    SchedulerConfig {
        interval_secs: 300,
        batch_size: 5,
        ..SchedulerConfig::default()
    }
}

fn scheduler_with(fetcher: FakeFetcher, cache: &JobCache) -> BatchScheduler {
    let extractor = Extractor::new(
        Arc::new(EchoProvider),
        &ExtractionConfig::default(),
        Duration::from_secs(60),
    );
    let pipeline = BatchPipeline::new(
        Arc::new(fetcher),
        extractor,
        Arc::new(MemorySink::default()),
        cache.clone(),
    );
    BatchScheduler::new(registry(), Some(pipeline), cache.clone(), &config())
}

fn fast_fetcher() -> FakeFetcher {
    FakeFetcher {
        delay: Duration::ZERO,
        cancel_after: None,
    }
}

fn logged_sources(cache: &JobCache) -> Vec<Vec<String>> {
    cache.logs().into_iter().map(|entry| entry.sources).collect()
}

#[tokio::test]
async fn test_batches_walk_registry_round_robin() {
    let cache = JobCache::default();
    let scheduler = scheduler_with(fast_fetcher(), &cache);

    let first = scheduler.try_run_batch().await.expect("first batch");
    assert_eq!(first.jobs_added, 5);
    assert_eq!(scheduler.status().next_index, 5);

    let second = scheduler.try_run_batch().await.expect("second batch");
    assert_eq!(second.sources, vec!["F", "G", "A", "B", "C"]);
    // A, B and C were already stored by the first batch
    assert_eq!(second.jobs_added, 2);
    assert_eq!(scheduler.status().next_index, 3);

    assert_eq!(
        logged_sources(&cache),
        vec![
            vec!["A", "B", "C", "D", "E"],
            vec!["F", "G", "A", "B", "C"]
        ]
    );
    assert!(cache.logs().iter().all(|e| e.status == BatchStatus::Success));
    assert_eq!(cache.stats().len(), 7);
}

#[tokio::test]
async fn test_missing_ai_client_logs_failed_batch() {
    let cache = JobCache::default();
    let scheduler = BatchScheduler::new(registry(), None, cache.clone(), &config());

    let err = scheduler.try_run_batch().await.unwrap_err();
    assert_eq!(err, SchedulerError::AiUnavailable);

    let logs = cache.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, BatchStatus::Failed);
    assert_eq!(logs[0].error.as_deref(), Some("AI client not initialized"));
    assert!(logs[0].sources.is_empty());
    assert_eq!(logs[0].jobs_added, 0);

    let status = scheduler.status();
    assert!(!status.ai_available);
    assert_eq!(status.next_index, 0);
    assert_eq!(status.state, SchedulerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_manual_trigger_is_single_flight() {
    let cache = JobCache::default();
    let scheduler = Arc::new(scheduler_with(
        FakeFetcher {
            delay: Duration::from_secs(10),
            cancel_after: None,
        },
        &cache,
    ));

    let handle = scheduler.trigger().expect("first trigger starts");
    assert_eq!(scheduler.state(), SchedulerState::Running);
    assert_eq!(scheduler.trigger().unwrap_err(), SchedulerError::Busy);
    assert_eq!(
        scheduler.try_run_batch().await.unwrap_err(),
        SchedulerError::Busy
    );

    let report = handle.await.expect("batch task");
    assert_eq!(report.processed(), 5);
    assert_eq!(scheduler.state(), SchedulerState::Idle);
    // Only the triggered batch was logged
    assert_eq!(cache.logs().len(), 1);

    let again = scheduler.trigger().expect("idle again");
    again.await.expect("batch task");
    assert_eq!(cache.logs().len(), 2);
}

#[tokio::test]
async fn test_shutdown_mid_batch() {
    let cache = JobCache::default();
    let cancel = CancellationToken::new();
    let scheduler = scheduler_with(
        FakeFetcher {
            delay: Duration::ZERO,
            cancel_after: Some(("B".to_string(), cancel.clone())),
        },
        &cache,
    )
    .with_cancellation(cancel);

    let report = scheduler.try_run_batch().await.expect("batch runs");

    assert!(report.interrupted);
    assert_eq!(report.processed(), 2);
    assert_eq!(scheduler.status().next_index, 2);

    let logs = cache.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].sources, vec!["A", "B"]);
    assert_eq!(logs[0].status, BatchStatus::Failed);
    assert_eq!(logs[0].error.as_deref(), Some("interrupted by shutdown"));
    assert_eq!(logs[0].jobs_added, 2);

    assert_eq!(
        scheduler.try_run_batch().await.unwrap_err(),
        SchedulerError::ShuttingDown
    );
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_fires_immediately_then_on_interval() {
    let cache = JobCache::default();
    let scheduler = Arc::new(scheduler_with(fast_fetcher(), &cache));

    let runner = {
        let scheduler = Arc::clone(&scheduler);
        tokio::spawn(async move { scheduler.run().await })
    };

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(cache.logs().len(), 1);

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(cache.logs().len(), 2);
    assert_eq!(scheduler.status().next_index, 3);

    scheduler.shutdown();
    runner.await.expect("loop exits on shutdown");
    assert_eq!(cache.logs().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_run_waits_for_triggered_batch_on_shutdown() {
    let cache = JobCache::default();
    let scheduler = Arc::new(scheduler_with(
        FakeFetcher {
            delay: Duration::from_secs(10),
            cancel_after: None,
        },
        &cache,
    ));

    let _detached = scheduler.trigger().expect("trigger starts");
    // Let the batch get into its first fetch
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(scheduler.state(), SchedulerState::Running);

    scheduler.shutdown();
    scheduler.run().await;

    assert_eq!(scheduler.state(), SchedulerState::Idle);
    let logs = cache.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, BatchStatus::Failed);
    assert_eq!(logs[0].error.as_deref(), Some("interrupted by shutdown"));
    // The source in flight finished before the batch stopped
    assert_eq!(logs[0].sources, vec!["A"]);
    assert_eq!(scheduler.status().next_index, 1);
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_keeps_going_without_ai_client() {
    let cache = JobCache::default();
    let scheduler = Arc::new(BatchScheduler::new(
        registry(),
        None,
        cache.clone(),
        &config(),
    ));

    let runner = {
        let scheduler = Arc::clone(&scheduler);
        tokio::spawn(async move { scheduler.run().await })
    };

    tokio::time::sleep(Duration::from_secs(601)).await;
    scheduler.shutdown();
    runner.await.expect("loop exits on shutdown");

    let logs = cache.logs();
    assert_eq!(logs.len(), 3);
    assert!(logs.iter().all(|e| e.status == BatchStatus::Failed));
}
