//! HTTP API for Veracity
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /analyze/text - Analyze article text `{text, url?}`
//! - POST /analyze/url - Fetch and analyze an article `{url}`
//! - POST /analyze/image - Analyze raw image bytes

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::pipeline::{ArticlePipeline, ImagePipeline};
use super::report::save_report;
use crate::error::Error;
use crate::types::{ArticleReport, ImageReport, Report};

/// Largest accepted image upload
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// Shared services, built once
pub struct AppState {
    pub image: Arc<ImagePipeline>,
    pub article: Arc<ArticlePipeline>,
    /// Reports are persisted here when set
    pub report_dir: Option<PathBuf>,
}

/// Analyze text request
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
    pub url: Option<String>,
}

/// Analyze URL request
#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub faces_enabled: bool,
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Crate error rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::ImageLoad(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Fetch(_) => StatusCode::BAD_GATEWAY,
            Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze/text", post(analyze_text))
        .route("/analyze/url", post(analyze_url))
        .route("/analyze/image", post(analyze_image))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))
        .with_state(Arc::new(state))
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        faces_enabled: state.image.faces_enabled(),
    })
}

/// Analyze submitted text
async fn analyze_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Result<Json<ArticleReport>, ApiError> {
    let report = state.article.analyze_text(&req.text, req.url.as_deref()).await?;
    persist(&state, Report::Article(report.clone()));
    Ok(Json(report))
}

/// Fetch and analyze a URL
async fn analyze_url(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UrlRequest>,
) -> Result<Json<ArticleReport>, ApiError> {
    let report = state.article.analyze_url(&req.url).await?;
    persist(&state, Report::Article(report.clone()));
    Ok(Json(report))
}

/// Analyze an uploaded image; CPU work runs off the async workers
async fn analyze_image(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ImageReport>, ApiError> {
    if body.is_empty() {
        return Err(Error::InvalidInput("empty image body".to_string()).into());
    }
    let digest = Sha256::digest(&body);
    let source = format!("upload:{:02x}{:02x}{:02x}{:02x}", digest[0], digest[1], digest[2], digest[3]);
    let pipeline = state.image.clone();
    let report = tokio::task::spawn_blocking(move || pipeline.analyze_bytes(&body, &source))
        .await
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))??;
    persist(&state, Report::Image(report.clone()));
    Ok(Json(report))
}

/// Best-effort save; a failed write never fails the request
fn persist(state: &AppState, report: Report) {
    if let Some(dir) = &state.report_dir {
        if let Err(e) = save_report(&report, dir) {
            warn!(error = %e, id = report.id(), "could not save report");
        }
    }
}

/// Run the API server
pub async fn run_server(addr: &str, state: AppState) -> crate::Result<()> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, "Veracity API listening");
    println!("🔎 Veracity API running on {}", addr);
    println!("  GET  /health         - Health check");
    println!("  POST /analyze/text   - Analyze article text");
    println!("  POST /analyze/url    - Fetch and analyze article");
    println!("  POST /analyze/image  - Analyze image bytes");
    axum::serve(listener, router).await?;
    Ok(())
}
