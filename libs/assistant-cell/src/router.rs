use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::models::AssistantCellState;

pub fn assistant_routes(state: Arc<AssistantCellState>) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat))
        .route("/.well-known/mcp.json", get(handlers::mcp_manifest))
        .with_state(state)
}
