//! HTTP API for the pipeline
//!
//! Routes:
//! - `POST /parse`: run the bounded-async strategy inline, return its report
//! - `POST /parse_async`: queue a batch, return a task id immediately
//! - `GET /tasks/{id}`: poll a job's state
//!
//! An unknown task id, including one that does not parse as a UUID, is a
//! 404, never a generic in-progress label.

use crate::config::Config;
use crate::jobs::{ExecutionContext, JobQueue, JobState};
use crate::storage::{CategoryStore, StorePool};
use crate::strategy::{self, StrategyKind};
use crate::MillError;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub queue: JobQueue,
    pub pool: StorePool,
}

impl AppState {
    pub fn new(config: Arc<Config>, pool: StorePool) -> Self {
        Self {
            config,
            queue: JobQueue::new(),
            pool,
        }
    }

    fn execution_context(&self) -> ExecutionContext {
        ExecutionContext {
            config: Arc::clone(&self.config),
            pool: self.pool.clone(),
            strategy: self.config.server.job_strategy,
        }
    }
}

/// Request body for both parse endpoints
#[derive(Debug, Deserialize)]
pub struct UrlBatch {
    pub urls: Vec<String>,
}

/// Maps [`MillError`] onto HTTP responses
pub struct ApiError(MillError);

impl From<MillError> for ApiError {
    fn from(e: MillError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            MillError::EmptyBatch => (
                StatusCode::BAD_REQUEST,
                json!({"error": self.0.to_string()}),
            ),
            MillError::JobNotFound { .. } => {
                (StatusCode::NOT_FOUND, json!({"error": "task not found"}))
            }
            e => {
                tracing::error!("request failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": e.to_string()}),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/parse", post(parse_sync))
        .route("/parse_async", post(parse_async))
        .route("/tasks/:id", get(task_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Blocks until the bounded-async strategy finishes the batch
async fn parse_sync(
    State(state): State<AppState>,
    Json(batch): Json<UrlBatch>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let report = strategy::run(
        StrategyKind::BoundedAsync,
        Arc::clone(&state.config),
        state.pool.clone(),
        batch.urls,
    )
    .await?;

    Ok(Json(json!({
        "elapsed_sec": report.elapsed.as_secs_f64(),
        "saved": report.saved,
    })))
}

/// Queues a batch and returns its task id without waiting for execution
async fn parse_async(
    State(state): State<AppState>,
    Json(batch): Json<UrlBatch>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.queue.submit(state.execution_context(), batch.urls)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({"task_id": id.to_string(), "status": "queued"})),
    ))
}

/// Reports a job's current state
async fn task_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| MillError::JobNotFound { id })?;
    let record = state.queue.poll(id)?;

    let body = match record.state {
        JobState::Pending => json!({"status": "pending"}),
        JobState::Running => json!({"status": "running"}),
        JobState::Succeeded { elapsed_sec, saved } => json!({
            "status": "done",
            "result": {"elapsed_sec": elapsed_sec, "saved": saved},
        }),
        JobState::Failed { error } => json!({"status": "failed", "error": error}),
    };

    Ok(Json(body))
}

/// Binds the configured address and serves the API until shutdown
pub async fn serve(config: Config) -> crate::Result<()> {
    let addr: std::net::SocketAddr = config.server.bind_addr.parse()?;

    let db_path = std::path::Path::new(&config.database.path);
    // Open one connection up front so schema or path problems surface at
    // startup rather than on the first request.
    CategoryStore::open(db_path)?;
    let pool = StorePool::new(db_path, config.pipeline.store_pool_size as usize);

    let state = AppState::new(Arc::new(config), pool);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API listening on {}", addr);
    axum::serve(listener, router(state)).await?;

    Ok(())
}
