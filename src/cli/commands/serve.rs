//! HTTP API server for integration with other systems.
//!
//! Provides REST endpoints for outlet listing, proximity search, and
//! question answering.

use crate::answer::QueryAnswer;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::OutpostError;
use crate::geo::NearbyOutlet;
use crate::orchestrator::QueryEngine;
use crate::store::{Outlet, OutletStore};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    // Listing and proximity search still work without keys
    if let Err(e) = preflight::check(Operation::Serve, &settings) {
        Output::warning(&format!("{}", e));
        Output::warning("/chat-completion will fail until the key is set.");
    }

    let engine = Arc::new(QueryEngine::new(settings)?);
    let app = router(engine);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Outpost API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Outlets", "GET  /outlets");
    Output::kv("Nearby", "GET  /outlets/nearby?latitude=&longitude=&distance_km=");
    Output::kv("Ask", "POST /chat-completion");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the API router over a shared engine.
pub fn router(engine: Arc<QueryEngine>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/outlets", get(list_outlets))
        .route("/outlets/nearby", get(nearby_outlets))
        .route("/chat-completion", post(chat_completion))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(engine)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct NearbyParams {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    distance_km: Option<f64>,
}

#[derive(Deserialize)]
struct ChatRequest {
    query: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// An error rendered as `{"error": ...}` with a status chosen by its cause.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<OutpostError> for ApiError {
    fn from(err: OutpostError) -> Self {
        let status = status_for(&err);
        if status.is_server_error() {
            error!("Request failed: {}", err);
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// HTTP status for an engine error.
fn status_for(err: &OutpostError) -> StatusCode {
    if err.is_caller_error() {
        StatusCode::BAD_REQUEST
    } else if err.is_upstream() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_outlets(
    State(engine): State<Arc<QueryEngine>>,
) -> Result<Json<Vec<Outlet>>, ApiError> {
    Ok(Json(engine.store().list_outlets().await?))
}

async fn nearby_outlets(
    State(engine): State<Arc<QueryEngine>>,
    params: Result<Query<NearbyParams>, QueryRejection>,
) -> Result<Json<Vec<NearbyOutlet>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let results = engine
        .nearby_outlets(params.latitude, params.longitude, params.distance_km)
        .await?;
    Ok(Json(results))
}

async fn chat_completion(
    State(engine): State<Arc<QueryEngine>>,
    request: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<QueryAnswer>, ApiError> {
    let Json(request) = request.map_err(|e| ApiError::bad_request(e.body_text()))?;
    Ok(Json(engine.resolve_query(&request.query).await?))
}
