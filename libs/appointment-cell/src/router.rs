// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::models::AppointmentCellState;

/// Mounted under `/appointments`.
pub fn appointment_routes(state: Arc<AppointmentCellState>) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/summary", get(handlers::get_summary))
        .route("/summary/share", post(handlers::share_summary))
        .with_state(state)
}

/// Booking form endpoint at the root path.
pub fn booking_routes(state: Arc<AppointmentCellState>) -> Router {
    Router::new()
        .route("/book", post(handlers::book_appointment))
        .with_state(state)
}
