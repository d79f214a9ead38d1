use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::models::DoctorCellState;

pub fn doctor_routes(state: Arc<DoctorCellState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/directory", get(handlers::doctor_directory))
        .route("/schedule", get(handlers::get_schedule))
        .route("/recommendation", get(handlers::recommend_specialization))
        .with_state(state)
}
