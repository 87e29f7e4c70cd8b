//! Axum app: state, router, and handlers.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rigsmith::{BuildError, Planner};
use serde::Deserialize;
use tracing::{error, info};

use super::response::{error_response, BuildResponse};

/// Server limits.
#[derive(Clone, Debug)]
pub(crate) struct ServeConfig {
    /// Max request body size in bytes.
    pub(crate) body_limit_bytes: usize,
    /// Max prompt length in characters; longer prompts are rejected with 400.
    pub(crate) max_prompt_chars: usize,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            body_limit_bytes: 64 * 1024,
            max_prompt_chars: 4000,
        }
    }
}

/// Builds ServeConfig from environment variables, falling back to [`Default`] for unset or
/// invalid values.
///
/// - `SERVE_BODY_LIMIT_BYTES` (default 65536)
/// - `SERVE_MAX_PROMPT_CHARS` (default 4000)
pub(crate) fn serve_config_from_env() -> ServeConfig {
    let default = ServeConfig::default();
    ServeConfig {
        body_limit_bytes: std::env::var("SERVE_BODY_LIMIT_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(default.body_limit_bytes),
        max_prompt_chars: std::env::var("SERVE_MAX_PROMPT_CHARS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(default.max_prompt_chars),
    }
}

/// Shared state: the process-wide planner and server limits.
pub(crate) struct AppState {
    pub(crate) planner: Arc<Planner>,
    pub(crate) config: ServeConfig,
}

pub(crate) fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.body_limit_bytes;
    Router::new()
        .route("/api/build", post(build_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct BuildRequest {
    prompt: String,
    budget: f64,
}

/// Whole positive currency units; fractional budgets are rounded.
fn validate_budget(budget: f64) -> Option<u64> {
    if !budget.is_finite() || budget < 0.5 || budget > u64::MAX as f64 {
        return None;
    }
    Some(budget.round() as u64)
}

async fn build_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BuildRequest>,
) -> Response {
    let Some(budget) = validate_budget(request.budget) else {
        return error_response(StatusCode::BAD_REQUEST, "invalid budget");
    };
    if request.prompt.chars().count() > state.config.max_prompt_chars {
        return error_response(StatusCode::BAD_REQUEST, "prompt too long");
    }

    info!(budget, prompt_chars = request.prompt.chars().count(), "build request");
    match state.planner.run(&request.prompt, budget).await {
        Ok(outcome) => (StatusCode::OK, Json(BuildResponse::from(outcome))).into_response(),
        Err(BuildError::InvalidBudget) => error_response(StatusCode::BAD_REQUEST, "invalid budget"),
        Err(e) => {
            error!(error = %e, "build request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
