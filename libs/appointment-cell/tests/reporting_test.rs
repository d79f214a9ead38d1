// libs/appointment-cell/tests/reporting_test.rs
use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Duration;

use appointment_cell::{Report, ReportPeriod, ReportingService};
use notification_cell::{LoggingChannelNotifier, MockChannelNotifier};
use shared_database::{ClinicStore, InMemoryClinicStore};
use shared_models::{AppointmentStatus, NewAppointment, NewPatient};
use shared_utils::test_utils::{at, doctor_fixture, fixture_date};

/// Ravi (id 1) sees Sandeep at 14:00 and Amit at 09:00 today; Priya (id 2)
/// saw Jane yesterday.
async fn clinic() -> Arc<InMemoryClinicStore> {
    let store = Arc::new(InMemoryClinicStore::new());
    let today = fixture_date();
    let yesterday = today - Duration::days(1);

    store
        .insert_doctor(doctor_fixture("Dr. Ravi Ahuja", "Cardiologist", today, &["09:00", "14:00"]))
        .await
        .unwrap();
    store
        .insert_doctor(doctor_fixture("Dr. Priya Sharma", "Dermatologist", yesterday, &["10:00"]))
        .await
        .unwrap();

    let sandeep = store
        .insert_patient(NewPatient {
            name: "Sandeep Madwal".to_string(),
            email: "sandeep.madwal2007@gmail.com".to_string(),
            symptoms: Some("Fever and cough".to_string()),
        })
        .await
        .unwrap();
    let jane = store
        .insert_patient(NewPatient {
            name: "Jane Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            symptoms: Some("Annual checkup".to_string()),
        })
        .await
        .unwrap();
    let amit = store
        .insert_patient(NewPatient {
            name: "Amit Singh".to_string(),
            email: "amit.singh@example.com".to_string(),
            symptoms: Some("Headache with high fever".to_string()),
        })
        .await
        .unwrap();

    store
        .insert_appointment(NewAppointment::booked(1, sandeep.id, at(today, "14:00")))
        .await
        .unwrap();
    let mut done = NewAppointment::booked(1, amit.id, at(today, "09:00"));
    done.status = AppointmentStatus::Completed;
    store.insert_appointment(done).await.unwrap();
    store
        .insert_appointment(NewAppointment::booked(2, jane.id, at(yesterday, "10:00")))
        .await
        .unwrap();

    store
}

fn reporting(store: Arc<InMemoryClinicStore>) -> ReportingService {
    ReportingService::new(store, Arc::new(LoggingChannelNotifier))
}

#[tokio::test]
async fn today_lists_every_status_in_time_order() {
    let service = reporting(clinic().await);

    let report = service
        .summarize_on("What appointments do I have today?", Some("Ravi"), fixture_date())
        .await
        .unwrap();

    assert_matches!(report, Report::DayListing { period: ReportPeriod::Today, ref entries } if entries.len() == 2);
    assert_eq!(
        report.to_string(),
        "You have 2 appointment(s) today:\n\
         - At 09:00 AM with patient: amit.singh@example.com\n\
         - At 02:00 PM with patient: sandeep.madwal2007@gmail.com"
    );
}

#[tokio::test]
async fn yesterday_without_appointments_says_so() {
    let service = reporting(clinic().await);

    let report = service
        .summarize_on("how was yesterday", Some("Dr. Ravi Ahuja"), fixture_date())
        .await
        .unwrap();

    assert_eq!(report.to_string(), "You had no appointments yesterday.");
}

#[tokio::test]
async fn yesterday_without_doctor_filter_covers_everyone() {
    let service = reporting(clinic().await);

    let report = service.summarize_on("yesterday", None, fixture_date()).await.unwrap();

    assert_eq!(
        report.to_string(),
        "You have 1 appointment(s) yesterday:\n- At 10:00 AM with patient: jane.smith@example.com"
    );
}

#[tokio::test]
async fn symptom_count_spans_all_appointments() {
    let service = reporting(clinic().await);

    let report = service
        .summarize_on("How many patients with fever", None, fixture_date())
        .await
        .unwrap();

    assert_eq!(
        report,
        Report::SymptomCount {
            symptom: "fever".to_string(),
            count: 2
        }
    );
    assert_eq!(report.to_string(), "Found 2 patient(s) with symptoms related to 'fever'.");
}

#[tokio::test]
async fn doctor_phrase_is_stripped_before_symptom_search() {
    let service = reporting(clinic().await);

    let report = service
        .summarize_on("how many patients with fever for ravi ahuja", Some("Dr. Ravi Ahuja"), fixture_date())
        .await
        .unwrap();

    assert_eq!(
        report,
        Report::SymptomCount {
            symptom: "fever".to_string(),
            count: 2
        }
    );

    let other = service
        .summarize_on("how many patients with fever", Some("Priya"), fixture_date())
        .await
        .unwrap();
    assert_matches!(other, Report::SymptomCount { count: 0, .. });
}

#[tokio::test]
async fn unknown_doctor_filter_is_a_report() {
    let service = reporting(clinic().await);

    let report = service
        .summarize_on("today", Some("Dr. Who"), fixture_date())
        .await
        .unwrap();

    assert_eq!(report.to_string(), "Could not find doctor: Dr. Who");
}

#[tokio::test]
async fn summarize_has_no_side_effects() {
    let store = clinic().await;
    let before = store.list_doctors().await.unwrap();
    let service = reporting(store.clone());

    service.summarize_on("today", None, fixture_date()).await.unwrap();
    service.summarize_on("fever", None, fixture_date()).await.unwrap();

    assert_eq!(store.list_doctors().await.unwrap(), before);
    assert_eq!(store.count_appointments_with_symptom(None, "").await.unwrap(), 3);
}

#[tokio::test]
async fn share_report_posts_the_rendered_report() {
    let store = clinic().await;
    let mut channel = MockChannelNotifier::new();
    channel
        .expect_send_channel_report()
        .withf(|doctor, report| doctor.starts_with("Ravi") && report.starts_with("Found"))
        .times(1)
        .returning(|_, _| Ok(true));

    let service = ReportingService::new(store, Arc::new(channel));
    let report = service.share_report("how many patients with cough", "Ravi").await.unwrap();

    assert_matches!(report, Report::SymptomCount { count: 1, .. });
}

#[tokio::test]
async fn share_report_skips_the_channel_for_unknown_doctors() {
    let channel = MockChannelNotifier::new();
    let service = ReportingService::new(clinic().await, Arc::new(channel));

    let report = service.share_report("today", "Nobody").await.unwrap();

    assert_matches!(report, Report::DoctorNotFound { .. });
}
