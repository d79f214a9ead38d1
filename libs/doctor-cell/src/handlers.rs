use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use shared_models::error::AppError;

use crate::models::{DoctorCellState, DoctorError, ScheduleResponse};
use crate::services::{AvailabilityService, DoctorService, RecommendationService};

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub doctor_name: String,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub symptoms: String,
}

fn to_app_error(err: DoctorError) -> AppError {
    match err {
        DoctorError::NotFound(query) => AppError::NotFound(format!("Doctor '{}' not found.", query)),
        DoctorError::Storage(e) => AppError::Database(e.to_string()),
    }
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<DoctorCellState>>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(Arc::clone(&state.store));

    let doctors = doctor_service.list_doctors().await.map_err(to_app_error)?;

    Ok(Json(json!(doctors)))
}

#[axum::debug_handler]
pub async fn doctor_directory(
    State(state): State<Arc<DoctorCellState>>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(Arc::clone(&state.store));

    Ok(Json(json!({ "reply": doctor_service.directory_message().await })))
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<DoctorCellState>>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Value>, AppError> {
    debug!("Schedule requested for '{}' on '{}'", query.doctor_name, query.date);
    let availability_service = AvailabilityService::new(Arc::clone(&state.store));

    let outcome = availability_service
        .get_schedule(&query.doctor_name, &query.date)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!(ScheduleResponse::from(&outcome))))
}

#[axum::debug_handler]
pub async fn recommend_specialization(
    State(state): State<Arc<DoctorCellState>>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<Value>, AppError> {
    let recommendation_service = RecommendationService::new(Arc::clone(&state.store));

    let recommendation = recommendation_service
        .recommend(&query.symptoms)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({ "reply": recommendation.to_string() })))
}
