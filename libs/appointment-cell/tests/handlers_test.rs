// libs/appointment-cell/tests/handlers_test.rs
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::router::{appointment_routes, booking_routes};
use appointment_cell::AppointmentCellState;
use notification_cell::{LoggingCalendarScheduler, LoggingChannelNotifier, LoggingEmailNotifier};
use shared_database::{ClinicStore, InMemoryClinicStore, MockClinicStore, StoreError};
use shared_utils::test_utils::{doctor_fixture, fixture_date};

async fn app() -> Router {
    let store = Arc::new(InMemoryClinicStore::new());
    store
        .insert_doctor(doctor_fixture("Dr. Ravi Ahuja", "Cardiologist", fixture_date(), &["14:00"]))
        .await
        .unwrap();

    let state = Arc::new(AppointmentCellState {
        store,
        calendar: Arc::new(LoggingCalendarScheduler::new()),
        email: Arc::new(LoggingEmailNotifier),
        channel: Arc::new(LoggingChannelNotifier),
    });

    Router::new()
        .merge(booking_routes(state.clone()))
        .nest("/appointments", appointment_routes(state))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn form_booking_replies_with_outcome() {
    let (status, json) = send(
        app().await,
        post_json(
            "/book",
            json!({
                "doctor_name": "Ravi",
                "date": "2030-01-15",
                "time": "2 PM",
                "email": "a@example.com"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "success");
    assert_eq!(json["appointment_id"], 1);
    assert_eq!(
        json["reply"],
        "Success! Your appointment is booked with Dr. Ravi Ahuja on 2030-01-15 at 14:00."
    );
}

#[tokio::test]
async fn second_form_booking_conflicts() {
    let app = app().await;
    let body = json!({
        "doctor_name": "Ravi",
        "date": "2030-01-15",
        "time": "14:00",
        "patient_email": "a@example.com",
        "symptoms": "chest pain"
    });

    let (_, first) = send(app.clone(), post_json("/appointments", body.clone())).await;
    assert_eq!(first["outcome"], "success");

    let (status, second) = send(app, post_json("/book", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["outcome"], "slot_conflict");
    assert!(second["appointment_id"].is_null());
}

#[tokio::test]
async fn blank_email_is_a_bad_request() {
    let (status, json) = send(
        app().await,
        post_json(
            "/book",
            json!({ "doctor_name": "Ravi", "date": "today", "time": "2 PM", "email": " " }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "email is required");
}

#[tokio::test]
async fn summary_endpoint_counts_symptoms() {
    let app = app().await;
    send(
        app.clone(),
        post_json(
            "/book",
            json!({
                "doctor_name": "Ravi",
                "date": "2030-01-15",
                "time": "14:00",
                "email": "b@example.com",
                "symptoms": "Fever"
            }),
        ),
    )
    .await;

    let (status, json) = send(
        app,
        Request::builder()
            .uri("/appointments/summary?query=how%20many%20patients%20with%20fever&doctor_name=Ravi")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], "Found 1 patient(s) with symptoms related to 'fever'.");
}

#[tokio::test]
async fn share_endpoint_returns_the_report() {
    let (status, json) = send(
        app().await,
        post_json(
            "/appointments/summary/share",
            json!({ "query": "how many patients with rash", "doctor_name": "Ravi" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], "Found 0 patient(s) with symptoms related to 'rash'.");
}

fn failing_app(store: MockClinicStore) -> Router {
    let state = Arc::new(AppointmentCellState {
        store: Arc::new(store),
        calendar: Arc::new(LoggingCalendarScheduler::new()),
        email: Arc::new(LoggingEmailNotifier),
        channel: Arc::new(LoggingChannelNotifier),
    });

    Router::new()
        .merge(booking_routes(state.clone()))
        .nest("/appointments", appointment_routes(state))
}

#[tokio::test]
async fn storage_failure_during_booking_is_a_reply() {
    let mut store = MockClinicStore::new();
    store
        .expect_find_doctor_by_name()
        .returning(|_| Err(StoreError::Backend("connection refused".to_string())));
    store.expect_insert_appointment().never();

    let (status, json) = send(
        failing_app(store),
        post_json(
            "/book",
            json!({
                "doctor_name": "Ravi",
                "date": "2030-01-15",
                "time": "2 PM",
                "email": "a@example.com"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "error");
    assert_eq!(json["appointment_id"], Value::Null);
    assert_eq!(
        json["reply"],
        "Error booking appointment: Database error: Storage backend error: connection refused"
    );
}

#[tokio::test]
async fn storage_failure_during_summary_is_a_reply() {
    let mut store = MockClinicStore::new();
    store
        .expect_count_appointments_with_symptom()
        .returning(|_, _| Err(StoreError::Backend("timeout".to_string())));

    let request = Request::builder()
        .uri("/appointments/summary?query=patients%20with%20fever")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(failing_app(store), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["reply"],
        "Error generating summary: Database error: Storage backend error: timeout"
    );
}
