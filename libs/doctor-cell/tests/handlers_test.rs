// libs/doctor-cell/tests/handlers_test.rs
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use doctor_cell::router::doctor_routes;
use doctor_cell::DoctorCellState;
use shared_database::{ClinicStore, InMemoryClinicStore};
use shared_utils::test_utils::{doctor_fixture, fixture_date};

async fn seeded_state() -> Arc<DoctorCellState> {
    let store = Arc::new(InMemoryClinicStore::new());
    store
        .insert_doctor(doctor_fixture("Dr. Ravi Ahuja", "Cardiologist", fixture_date(), &["14:00"]))
        .await
        .unwrap();
    store
        .insert_doctor(doctor_fixture("Dr. Priya Sharma", "Dermatologist", fixture_date(), &["09:00"]))
        .await
        .unwrap();
    Arc::new(DoctorCellState::new(store))
}

async fn get_json(state: Arc<DoctorCellState>, uri: &str) -> (StatusCode, Value) {
    let response = doctor_routes(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn lists_doctors_as_id_name_specialization() {
    let (status, json) = get_json(seeded_state().await, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["id"], 1);
    assert_eq!(json[0]["name"], "Dr. Ravi Ahuja");
    assert_eq!(json[1]["specialization"], "Dermatologist");
    assert!(json[0].get("availability").is_none());
}

#[tokio::test]
async fn directory_reply_lists_every_doctor() {
    let (_, json) = get_json(seeded_state().await, "/directory").await;

    assert_eq!(
        json["reply"],
        "Here are the available doctors:\n- Dr. Ravi Ahuja (Cardiologist)\n- Dr. Priya Sharma (Dermatologist)"
    );
}

#[tokio::test]
async fn empty_directory_says_so() {
    let state = Arc::new(DoctorCellState::new(Arc::new(InMemoryClinicStore::new())));
    let (_, json) = get_json(state, "/directory").await;

    assert_eq!(json["reply"], "There are no doctors available.");
}

#[tokio::test]
async fn schedule_endpoint_returns_free_slots() {
    let (status, json) = get_json(seeded_state().await, "/schedule?doctor_name=Ravi&date=2030-01-15").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["doctor"], "Dr. Ravi Ahuja");
    assert_eq!(json["date"], "2030-01-15");
    assert_eq!(json["available_slots"][0], "14:00");
}

#[tokio::test]
async fn schedule_without_params_is_rejected() {
    let response = doctor_routes(seeded_state().await)
        .oneshot(Request::builder().uri("/schedule").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recommendation_endpoint_replies_with_text() {
    let (_, json) = get_json(seeded_state().await, "/recommendation?symptoms=chest%20pain").await;

    assert_eq!(json["reply"], "For that symptom, I recommend a Cardiologist.");
}
