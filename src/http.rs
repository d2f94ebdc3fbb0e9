use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    explain::{LlmCallRecord, render_summary},
    pipeline::{PipelineReply, RailedPipeline},
};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RailedPipeline>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub content: String,
    #[serde(default)]
    pub history: Vec<(String, String)>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/explain", get(explain))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<PipelineReply>, (axum::http::StatusCode, String)> {
    let reply = state
        .pipeline
        .handle_message(&request.content, &request.history)
        .await
        .map_err(internal_error)?;

    Ok(Json(reply))
}

async fn explain(State(state): State<AppState>) -> Json<Vec<LlmCallRecord>> {
    let calls = state.pipeline.call_log().calls().await;
    info!("{}", render_summary(&calls));
    Json(calls)
}

fn internal_error(error: anyhow::Error) -> (axum::http::StatusCode, String) {
    (
        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        error.to_string(),
    )
}
