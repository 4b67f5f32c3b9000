//! Operational HTTP surface.
//!
//! Everything here is read-only except `POST /api/jobs/scrape`, which goes
//! through the scheduler's single-flight guard.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use jobwatch_cache::{ScrapeLogEntry, SourceStats};
use jobwatch_core::{JobCategory, JobRecord};
use jobwatch_db::{jobs, JobQuery, StoredJob};
use jobwatch_scheduler::SchedulerStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Build the router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/cache/jobs", get(cached_jobs))
        .route("/api/cache/stats", get(cache_stats))
        .route("/api/cache/logs", get(cache_logs))
        .route("/api/jobs", get(search_jobs))
        .route("/api/jobs/scrape", post(trigger_scrape))
        .route("/api/scheduler", get(scheduler_status))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CacheJobsParams {
    source: Option<String>,
}

async fn cached_jobs(
    State(state): State<AppState>,
    Query(params): Query<CacheJobsParams>,
) -> Json<Vec<JobRecord>> {
    let source = params.source.as_deref().filter(|s| !s.is_empty());
    Json(state.cache.get(source))
}

async fn cache_stats(State(state): State<AppState>) -> Json<BTreeMap<String, SourceStats>> {
    Json(state.cache.stats())
}

async fn cache_logs(State(state): State<AppState>) -> Json<Vec<ScrapeLogEntry>> {
    Json(state.cache.logs())
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: Option<String>,
    #[serde(rename = "type")]
    job_type: Option<String>,
    category: Option<String>,
}

impl SearchParams {
    fn into_query(self) -> Result<JobQuery, ApiError> {
        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(c) if c.eq_ignore_ascii_case("all") => None,
            Some(c) => Some(
                c.parse::<JobCategory>()
                    .map_err(|e| ApiError::bad_request(e.to_string()))?,
            ),
        };

        Ok(JobQuery {
            query: self.query,
            job_type: self.job_type,
            category,
        })
    }
}

async fn search_jobs(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<StoredJob>>, ApiError> {
    let filter = params.into_query()?;
    let found = jobs::search_jobs(state.db.pool(), &filter).await?;
    Ok(Json(found))
}

#[derive(Debug, Serialize)]
struct ScrapeStarted {
    status: &'static str,
    message: &'static str,
}

async fn trigger_scrape(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ScrapeStarted>), ApiError> {
    // The batch runs detached; progress shows up in the cache log
    let _handle = state.scheduler.trigger()?;
    Ok((
        StatusCode::ACCEPTED,
        Json(ScrapeStarted {
            status: "started",
            message: "Scrape batch started",
        }),
    ))
}

async fn scheduler_status(State(state): State<AppState>) -> Json<SchedulerStatus> {
    Json(state.scheduler.status())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stored_jobs: Option<i64>,
    degraded_sources: Vec<String>,
    scheduler: SchedulerStatus,
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let stored_jobs = match jobs::count_jobs(state.db.pool()).await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!("Health check query failed: {}", e);
            None
        }
    };

    let healthy = stored_jobs.is_some();
    let body = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" },
        database: if healthy { "ok" } else { "error" },
        stored_jobs,
        degraded_sources: state.cache.degraded_sources(),
        scheduler: state.scheduler.status(),
    };

    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(body))
}
