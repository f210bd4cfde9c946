use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use comeback_core::plan::days_from_json;
use comeback_core::provider::{OpenAiProvider, ProviderConfig};
use comeback_core::{ComebackPlan, GenerationError, PlanRequest, PlanService};

pub const GENERATE_PATH: &str = "/generate-comeback-plan";
pub const FUNCTION_PATH: &str = "/functions/v1/generate-comeback-plan";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Every failure on the generate route is a 500 with `{ "error": message }`.
pub struct AppError {
    message: String,
}

impl AppError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self { message: msg.into() }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        Self::internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

pub fn build_router(service: Arc<PlanService>) -> Router {
    Router::new()
        .route(GENERATE_PATH, post(generate_plan).options(preflight))
        .route(FUNCTION_PATH, post(generate_plan).options(preflight))
        .route("/health", get(health))
        .layer(cors_layer())
        .with_state(service)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(provider: ProviderConfig, bind: &str, port: u16) -> Result<()> {
    tracing::info!(model = %provider.model, base_url = %provider.base_url, "using completion provider");
    let provider = OpenAiProvider::new(provider)?;
    let app = build_router(Arc::new(PlanService::new(Arc::new(provider))));

    let listener = bind_listener(bind, port).await?;
    let addr = listener.local_addr()?;
    tracing::info!("comeback serve listening on http://{addr}{GENERATE_PATH}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("comeback serve shut down");
    Ok(())
}

/// Bind `bind:port`; `bind` may be a host name or a bare IPv6 address.
async fn bind_listener(bind: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((bind, port))
        .await
        .with_context(|| format!("failed to bind {bind} port {port}"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn preflight() -> &'static str {
    "ok"
}

async fn health() -> &'static str {
    "ok"
}

/// Decode `{ confession, goals, days }` from an untrusted body.
fn parse_request(body: &[u8]) -> Result<PlanRequest, AppError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::internal(format!("invalid request body: {e}")))?;

    let text_field = |name: &str| -> Result<String, AppError> {
        value
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::internal(format!("invalid request body: `{name}` must be a string")))
    };
    let confession = text_field("confession")?;
    let goals = text_field("goals")?;
    let days = days_from_json(value.get("days").unwrap_or(&Value::Null))?;

    Ok(PlanRequest::new(confession, goals, days))
}

async fn generate_plan(
    State(service): State<Arc<PlanService>>,
    body: Bytes,
) -> Result<Json<ComebackPlan>, AppError> {
    let request = parse_request(&body).inspect_err(|e| {
        tracing::warn!(error = %e.message, "rejected request body");
    })?;
    tracing::info!(days = request.days, "plan requested");
    let plan = service.generate_plan(&request).await?;
    Ok(Json(plan))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
