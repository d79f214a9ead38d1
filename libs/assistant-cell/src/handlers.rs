use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{AssistantCellState, ChatRequest};
use crate::services::tool_manifest;

#[axum::debug_handler]
pub async fn chat(
    State(state): State<Arc<AssistantCellState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, AppError> {
    let session_id = request.session_id.as_deref().map(str::trim).unwrap_or_default();
    let message = request.message.as_deref().map(str::trim).unwrap_or_default();

    if session_id.is_empty() || message.is_empty() {
        return Err(AppError::BadRequest("session_id and message are required.".to_string()));
    }

    let reply = state.chat.reply(session_id, message).await;

    Ok(Json(json!({ "reply": reply })))
}

pub async fn mcp_manifest() -> Json<Value> {
    Json(tool_manifest())
}
