//! HTTP API
//!
//! `GET /api/v1/info?url=<target>` fetches the target page and returns its
//! analysis as JSON. `GET /api/v1/health` answers `ok`.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::analyze::{AnalyzeOptions, analyze_url};
use crate::error::AnalysisError;
use crate::fetch::build_client;
use pagelens_scanner::PageAnalyzer;

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub client: Client,
    pub analyzer: Arc<PageAnalyzer>,
}

impl AppState {
    pub fn new(options: &AnalyzeOptions) -> std::result::Result<Self, AnalysisError> {
        Ok(Self {
            client: build_client(options.probe_timeout)?,
            analyzer: Arc::new(PageAnalyzer::with_config(options.probe_config())?),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct InfoQuery {
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    fn response(status: StatusCode, message: &str) -> Response {
        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    let api_v1 = Router::new()
        .route("/info", get(info_handler))
        .route("/health", get(health))
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .nest("/api/v1", api_v1)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

async fn info_handler(State(state): State<AppState>, Query(query): Query<InfoQuery>) -> Response {
    let target = query.url.unwrap_or_default();

    match analyze_url(&state.client, &state.analyzer, &target).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) if e.is_client_error() => {
            warn!("Rejected target '{}': {}", target, e);
            ErrorResponse::response(StatusCode::BAD_REQUEST, "invalid URL")
        }
        Err(e) => {
            warn!("Analysis of '{}' failed: {}", target, e);
            ErrorResponse::response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}

/// Serve the API on an already bound listener until `shutdown` resolves
pub async fn run<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    if let Ok(addr) = listener.local_addr() {
        info!("HTTP API server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    Ok(())
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(addr: &str, options: &AnalyzeOptions) -> Result<()> {
    let addr: SocketAddr = addr.parse().context("Invalid HTTP listen address")?;
    let state = AppState::new(options).context("Failed to build HTTP client")?;

    let listener = TcpListener::bind(&addr)
        .await
        .context("Failed to bind HTTP server")?;

    run(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("HTTP server shutting down");
    })
    .await
}
