use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use shared_models::error::AppError;

use crate::models::{AppointmentCellState, BookingOutcome, BookingRequest, ShareReportRequest};
use crate::services::{BookingService, ReportingService};

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub query: String,
    pub doctor_name: Option<String>,
}

fn validate_booking(request: &BookingRequest) -> Result<(), AppError> {
    let required = [
        ("doctor_name", &request.doctor_name),
        ("date", &request.date),
        ("time", &request.time),
        ("email", &request.email),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    if !request.email.contains('@') {
        return Err(AppError::BadRequest("email must be a valid address".to_string()));
    }
    Ok(())
}

fn outcome_body(outcome: &BookingOutcome) -> Value {
    let appointment_id = match outcome {
        BookingOutcome::Success { appointment_id, .. } => Some(*appointment_id),
        _ => None,
    };

    json!({
        "reply": outcome.to_string(),
        "outcome": outcome.kind(),
        "appointment_id": appointment_id,
    })
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppointmentCellState>>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<Value>, AppError> {
    validate_booking(&request)?;
    debug!("Form booking for {} with '{}'", request.email, request.doctor_name);

    let booking_service = BookingService::from_state(&state);
    let body = match booking_service.book(&request).await {
        Ok(outcome) => outcome_body(&outcome),
        Err(e) => json!({
            "reply": BookingService::failure_message(&e),
            "outcome": "error",
            "appointment_id": null,
        }),
    };

    Ok(Json(body))
}

#[axum::debug_handler]
pub async fn get_summary(
    State(state): State<Arc<AppointmentCellState>>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Value>, AppError> {
    let reporting_service = ReportingService::from_state(&state);

    let reply = reporting_service
        .summary_message(&query.query, query.doctor_name.as_deref())
        .await;

    Ok(Json(json!({ "reply": reply })))
}

#[axum::debug_handler]
pub async fn share_summary(
    State(state): State<Arc<AppointmentCellState>>,
    Json(request): Json<ShareReportRequest>,
) -> Result<Json<Value>, AppError> {
    if request.doctor_name.trim().is_empty() {
        return Err(AppError::BadRequest("doctor_name is required".to_string()));
    }

    let reporting_service = ReportingService::from_state(&state);
    let reply = match reporting_service
        .share_report(&request.query, &request.doctor_name)
        .await
    {
        Ok(report) => report.to_string(),
        Err(e) => ReportingService::failure_message(&e),
    };

    Ok(Json(json!({ "reply": reply })))
}
