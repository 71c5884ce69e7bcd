//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use phishguard_core::{Error, HybridVerdict};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::{debug, error, warn};

use crate::state::AppState;

/// Room for the JSON envelope around the message text
const BODY_OVERHEAD_BYTES: usize = 4 * 1024;

/// Largest JSON string escape (`\uXXXX`) per byte of message text
const MAX_ESCAPE_EXPANSION: usize = 6;

pub fn create_router(state: AppState) -> Router {
    let body_limit = request_body_limit(state.max_message_bytes);

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/v1/analyze", post(analyze))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Request body limit that admits any message up to `max_message_bytes`
fn request_body_limit(max_message_bytes: usize) -> usize {
    max_message_bytes
        .saturating_mul(MAX_ESCAPE_EXPANSION)
        .saturating_add(BODY_OVERHEAD_BYTES)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

/// Analysis request body
#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    message: Option<String>,
}

/// Analysis response body
#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    #[serde(flatten)]
    verdict: HybridVerdict,
    is_phishing: bool,
    rules_fired: bool,
    latency_us: u64,
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let start = Instant::now();
    metrics::counter!("phishguard_requests_total").increment(1);

    let Json(request) = payload.map_err(|e| {
        warn!("Rejected request body: {}", e.body_text());
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::body_too_large(state.max_message_bytes)
        } else {
            ApiError::from(Error::invalid_input(e.body_text()))
        }
    })?;

    let message = request
        .message
        .ok_or_else(|| Error::invalid_input("field 'message' is required and must be a string"))?;

    if message.len() > state.max_message_bytes {
        return Err(ApiError::too_large(message.len(), state.max_message_bytes));
    }

    let verdict = state.decision.decide(&message)?;
    let latency_us = start.elapsed().as_micros() as u64;

    metrics::counter!(
        "phishguard_verdicts_total",
        "final" => verdict.final_label.as_str(),
        "ai" => verdict.ai_label.as_str()
    )
    .increment(1);
    for finding in verdict.rule_report.findings() {
        metrics::counter!("phishguard_rule_hits_total", "rule" => finding.name().to_string())
            .increment(1);
    }
    metrics::histogram!("phishguard_decision_latency_us").record(latency_us as f64);

    debug!(
        final_label = %verdict.final_label,
        rules_fired = verdict.rule_report.len(),
        latency_us,
        "analyzed message"
    );

    Ok(Json(AnalyzeResponse {
        is_phishing: verdict.is_spam(),
        rules_fired: verdict.rule_report.fired(),
        verdict,
        latency_us,
    }))
}

async fn fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": {
                "kind": "not_found",
                "message": "Endpoint not found"
            }
        })),
    )
}

/// Error response with a JSON body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    fn too_large(size: usize, limit: usize) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            kind: "message_too_large",
            message: format!("message is {} bytes; the limit is {}", size, limit),
        }
    }

    fn body_too_large(limit: usize) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            kind: "message_too_large",
            message: format!("request body exceeds the message limit of {} bytes", limit),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match err {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(kind = self.kind, "Request failed: {}", self.message);
        }
        metrics::counter!("phishguard_errors_total", "kind" => self.kind).increment(1);

        (
            self.status,
            Json(json!({
                "error": {
                    "kind": self.kind,
                    "message": self.message
                }
            })),
        )
            .into_response()
    }
}
