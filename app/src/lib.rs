//! Jobwatch application wiring.
//!
//! Loads configuration, builds the pipeline from its parts, starts the
//! scheduler loop and serves the operational HTTP surface until Ctrl-C.

pub mod error;
pub mod routes;
pub mod state;

use anyhow::{Context, Result};
use jobwatch_cache::JobCache;
use jobwatch_core::AppConfig;
use jobwatch_db::Database;
use jobwatch_fetch::HttpFetcher;
use jobwatch_llm::{GeminiProvider, LlmProvider};
use jobwatch_scanner::{BatchPipeline, Extractor};
use jobwatch_scheduler::BatchScheduler;
use jobwatch_sources::SourceRegistry;
use state::AppState;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Initialize tracing with `RUST_LOG`, defaulting to `info,jobwatch=debug`.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,jobwatch=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

/// Build the AI backend, or `None` if it cannot be configured.
///
/// A missing key is not fatal: the scheduler keeps running and logs every
/// batch as failed until the process is restarted with a key.
pub fn build_provider(config: &AppConfig) -> Option<Arc<dyn LlmProvider>> {
    match GeminiProvider::from_config(&config.llm) {
        Ok(provider) => {
            tracing::info!(model = %config.llm.model, "AI backend ready");
            Some(Arc::new(provider))
        }
        Err(e) => {
            tracing::error!("AI client not initialized: {}", e);
            None
        }
    }
}

/// Assemble the scheduler from configuration and already opened resources.
pub fn build_scheduler(
    config: &AppConfig,
    registry: SourceRegistry,
    provider: Option<Arc<dyn LlmProvider>>,
    db: &Database,
    cache: &JobCache,
) -> Result<BatchScheduler> {
    let fetcher = Arc::new(HttpFetcher::new(&config.fetch).context("Failed to build HTTP client")?);

    let pipeline = provider.map(|provider| {
        let extractor = Extractor::new(provider, &config.extraction, config.llm.timeout());
        BatchPipeline::new(fetcher, extractor, Arc::new(db.clone()), cache.clone())
            .with_robots_check(config.fetch.respect_robots_txt)
    });

    Ok(BatchScheduler::new(
        registry,
        pipeline,
        cache.clone(),
        &config.scheduler,
    ))
}

/// Run the service until Ctrl-C.
pub async fn run() -> Result<()> {
    let config = AppConfig::load_with_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    let registry =
        SourceRegistry::from_config(&config.sources).context("Failed to load source registry")?;

    let db_path = config
        .database_path()
        .context("Failed to determine database path")?;
    tracing::info!("Opening job database at {}", db_path.display());
    let db = Database::open(&db_path)
        .await
        .context("Failed to open job database")?;

    let cache = JobCache::new(config.scheduler.degraded_after);
    let provider = build_provider(&config);

    let shutdown = CancellationToken::new();
    let scheduler = Arc::new(
        build_scheduler(&config, registry, provider, &db, &cache)?
            .with_cancellation(shutdown.clone()),
    );

    let scheduler_task = {
        let scheduler = Arc::clone(&scheduler);
        tokio::spawn(async move { scheduler.run().await })
    };

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                return;
            }
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        }
    });

    if config.server.enabled {
        let app = routes::router(AppState::new(cache.clone(), db.clone(), Arc::clone(&scheduler)));
        let listener = tokio::net::TcpListener::bind(&config.server.bind)
            .await
            .with_context(|| format!("Failed to bind to {}", config.server.bind))?;
        tracing::info!("Serving HTTP on {}", config.server.bind);

        let server_shutdown = shutdown.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
            .await
            .context("Server error")?;
    } else {
        shutdown.cancelled().await;
    }

    // Let the batch in flight reach a source boundary
    if let Err(e) = scheduler_task.await {
        tracing::error!("Scheduler task failed: {}", e);
    }
    db.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}
