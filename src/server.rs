//! REST control surface
//!
//! Provides two endpoints:
//! - `POST /api/crawler/start` - validates a start endpoint and launches a crawl
//!   in the background, answering `200 OK` before the crawl finishes
//! - `GET /api/crawler/status` - number of running crawls and the latest report
//!
//! Crawls triggered here go through the same engine entry point as the
//! command line.

use crate::crawler::{crawl_endpoint, CrawlEngine, HttpFetcher};
use crate::output::CrawlReport;
use crate::seed::parse_endpoint;
use crate::{CrawlError, SeedError};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

/// Shared state of the control surface
pub struct AppState {
    engine: CrawlEngine<HttpFetcher>,
    active_runs: AtomicUsize,
    latest: RwLock<Option<CrawlReport>>,
}

impl AppState {
    pub fn new(engine: CrawlEngine<HttpFetcher>) -> Self {
        Self {
            engine,
            active_runs: AtomicUsize::new(0),
            latest: RwLock::new(None),
        }
    }
}

/// Body of a start request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    #[serde(default)]
    pub start_endpoint: Option<String>,
}

/// Body of a status response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub active_runs: usize,
    pub latest: Option<CrawlReport>,
}

/// Errors returned to API clients
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, message).into_response()
    }
}

impl From<SeedError> for ApiError {
    fn from(err: SeedError) -> Self {
        match err {
            SeedError::EndpointNotSet => {
                ApiError::BadRequest("Starting endpoint must not be empty".to_string())
            }
            SeedError::InvalidEndpoint { endpoint, .. } => {
                ApiError::BadRequest(format!("Invalid starting endpoint '{}'", endpoint))
            }
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Builds the control surface router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/crawler/start", post(start_handler))
        .route("/api/crawler/status", get(status_handler))
        .with_state(state)
}

/// Serves the control surface on an already bound listener until it fails
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<(), CrawlError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Control surface listening on http://{}/", addr);
        tracing::info!("  - Start:  POST http://{}/api/crawler/start", addr);
        tracing::info!("  - Status: GET  http://{}/api/crawler/status", addr);
    }

    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Binds `bind_address` and serves the control surface
pub async fn start_server(bind_address: &str, state: Arc<AppState>) -> Result<(), CrawlError> {
    let listener = TcpListener::bind(bind_address).await?;
    serve(listener, state).await
}

async fn start_handler(
    State(state): State<Arc<AppState>>,
    request: Result<Json<CrawlRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = request?;
    let endpoint = parse_endpoint(request.start_endpoint.as_deref())?.to_string();

    state.active_runs.fetch_add(1, Ordering::SeqCst);
    tokio::spawn(run_in_background(Arc::clone(&state), endpoint.clone()));
    tracing::info!("Accepted crawl request for {}", endpoint);

    Ok((StatusCode::OK, "OK"))
}

async fn run_in_background(state: Arc<AppState>, endpoint: String) {
    match crawl_endpoint(&state.engine, Some(&endpoint)).await {
        Ok(report) => {
            tracing::info!(
                "Crawl of {} finished: {} requests, {} succeeded, {} failed",
                endpoint,
                report.stats.requests,
                report.stats.successes,
                report.stats.failures
            );
            *state.latest.write().await = Some(report);
        }
        Err(e) => tracing::error!("Crawl of {} failed: {}", endpoint, e),
    }
    state.active_runs.fetch_sub(1, Ordering::SeqCst);
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        active_runs: state.active_runs.load(Ordering::SeqCst),
        latest: state.latest.read().await.clone(),
    })
}
