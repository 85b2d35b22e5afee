// HTTP API routes (analysis, chat, health, metrics).

pub mod ws;

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::analysis::{AnalysisRequest, Analyzer};
use crate::hub::BoardHub;
use crate::metrics;

/// Provider budget for one chat reply.
const CHAT_MAX_TOKENS: u32 = 180;
const CHAT_TEMPERATURE: f64 = 0.8;

// ── Request types ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

// ── Shared application state ─────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub hub: BoardHub,
    pub analyzer: Arc<Analyzer>,
}

// ── Error helper ──────────────────────────────────────────────────────

fn json_error(status: StatusCode, msg: &str) -> impl IntoResponse {
    (status, Json(json!({ "error": msg })))
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/ai/analyze", post(analyze))
        .route("/api/chat", post(chat))
        .route("/metrics", get(metrics_text))
        .route("/ws/board", get(ws::ws_board))
        .with_state(state)
        .layer(CorsLayer::permissive());

    match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    }
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "tactical-board-backend" }))
}

async fn metrics_text() -> String {
    metrics::gather_metrics()
}

/// Analyze one board snapshot and mirror the result to every connected
/// viewer under the `tactical-analysis` event.
async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> impl IntoResponse {
    tracing::info!(
        green = request.green.len(),
        black = request.black.len(),
        "analyze request"
    );
    metrics::ANALYSES_TOTAL.inc();

    let result = state.analyzer.analyze(&request).await;
    match serde_json::to_value(&result) {
        Ok(value) => {
            state.hub.push("tactical-analysis", value.clone());
            (StatusCode::OK, Json(value)).into_response()
        }
        Err(e) => {
            tracing::error!("failed to serialize analysis result: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal analysis error")
                .into_response()
        }
    }
}

/// Free-form chat with the deployment's coach persona.
async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> impl IntoResponse {
    let message = match request.message.as_deref().map(str::trim) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => return json_error(StatusCode::BAD_REQUEST, "message is required").into_response(),
    };
    metrics::CHAT_REQUESTS_TOTAL.inc();

    let analyzer = &state.analyzer;
    if !analyzer.coach.is_enabled() {
        return json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "commentary provider key is not configured",
        )
        .into_response();
    }

    match analyzer
        .coach
        .complete(
            &analyzer.persona.system_prompt(),
            &message,
            CHAT_MAX_TOKENS,
            CHAT_TEMPERATURE,
        )
        .await
    {
        Ok(reply) => (StatusCode::OK, Json(json!({ "reply": reply }))).into_response(),
        Err(e) => {
            // A provider failure mid-conversation is not the caller's
            // problem; answer in character instead.
            tracing::warn!("chat provider failed: {e}");
            metrics::ENRICHMENT_FAILURES_TOTAL.inc();
            (
                StatusCode::OK,
                Json(json!({ "reply": analyzer.persona.quiet_reply })),
            )
                .into_response()
        }
    }
}
