//! HTTP API gateway for iiwake.
//!
//! Exposes the generation endpoint and a health check:
//!
//! - `GET  /health`      — liveness / version
//! - `POST /v1/reasons`  — generate up to three ranked excuses
//!
//! Built on Axum. All pipeline failures — upstream call failure, parse
//! failure, timeout — are converted at this boundary into one user-visible
//! error shape; the distinction lives only in the logs.

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use iiwake_core::provider::CompletionProvider;
use iiwake_core::{Error, ExcuseRequest, RankedReason};
use iiwake_engine::GenerateOptions;

/// The generic user-facing failure message. Upstream detail never leaves
/// the process.
const GENERATION_FAILURE_MESSAGE: &str = "適切な遅刻理由を生成できませんでした。";

/// Request body size limit — the four request fields are short free text.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared application state for the gateway.
///
/// The provider is constructed once at startup and lives as long as the
/// process; handlers only borrow it.
pub struct ApiState {
    pub provider: Arc<dyn CompletionProvider>,
    pub options: GenerateOptions,
    pub request_timeout: Duration,
}

pub type SharedState = Arc<ApiState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/reasons", post(reasons_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Fails fast when the provider cannot be built (missing API key is a
/// startup error, never a per-request one).
pub async fn start(config: iiwake_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let host = config.gateway.host.clone();
    let port = config.gateway.port;
    let addr = format!("{host}:{port}");

    let provider = iiwake_providers::build_from_config(&config)?;
    let state = Arc::new(ApiState {
        provider,
        options: GenerateOptions::from_config(&config),
        request_timeout: Duration::from_secs(config.gateway.request_timeout_secs),
    });

    let app = build_router(state);

    info!(addr = %addr, model = %config.model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct ReasonsResponse {
    reasons: Vec<RankedReason>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn generation_failure() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: GENERATION_FAILURE_MESSAGE.into(),
        }),
    )
}

async fn reasons_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ExcuseRequest>,
) -> Result<Json<ReasonsResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(
        target = %payload.target,
        delay = %payload.delay_time,
        has_situation = payload.situation().is_some(),
        tone = payload.tone().unwrap_or("指定なし"),
        "v1/reasons request"
    );

    let generation = iiwake_engine::generate(state.provider.as_ref(), &state.options, &payload);

    match tokio::time::timeout(state.request_timeout, generation).await {
        Ok(Ok(reasons)) => Ok(Json(ReasonsResponse { reasons })),
        Ok(Err(Error::Parse(e))) => {
            // The model answered but nothing valid could be extracted.
            // Internally distinct from an upstream failure, identical to
            // the caller.
            warn!(error = %e, "Completion parse produced no candidates");
            Err(generation_failure())
        }
        Ok(Err(e)) => {
            error!(error = %e, "Excuse generation failed");
            Err(generation_failure())
        }
        Err(_) => {
            error!(
                timeout_secs = state.request_timeout.as_secs(),
                "Excuse generation timed out"
            );
            Err(generation_failure())
        }
    }
}
