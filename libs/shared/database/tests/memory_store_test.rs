// libs/shared/database/tests/memory_store_test.rs
use assert_matches::assert_matches;

use shared_database::{seed_directory, AppointmentFilter, ClinicStore, InMemoryClinicStore, StoreError};
use shared_models::{AppointmentStatus, NewAppointment, NewPatient};
use shared_utils::test_utils::{at, doctor_fixture, fixture_date};

#[tokio::test]
async fn second_booking_for_same_slot_is_a_conflict() {
    let store = InMemoryClinicStore::new();
    let slot = at(fixture_date(), "14:00");

    store.insert_appointment(NewAppointment::booked(1, 1, slot)).await.unwrap();
    let second = store.insert_appointment(NewAppointment::booked(1, 2, slot)).await;

    assert_matches!(second, Err(StoreError::Conflict(_)));
    store.insert_appointment(NewAppointment::booked(2, 2, slot)).await.unwrap();
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let store = InMemoryClinicStore::new();
    store.insert_patient(NewPatient::from_email("a@example.com", None)).await.unwrap();

    let again = store.insert_patient(NewPatient::from_email("a@example.com", Some("cough"))).await;
    assert_matches!(again, Err(StoreError::Conflict(_)));
}

#[tokio::test]
async fn name_lookup_returns_first_match_by_id() {
    let store = InMemoryClinicStore::new();
    let date = fixture_date();
    store.insert_doctor(doctor_fixture("Dr. Anil Kumar", "Pediatrician", date, &["09:00"])).await.unwrap();
    store.insert_doctor(doctor_fixture("Dr. Anil Mehta", "Cardiologist", date, &["09:00"])).await.unwrap();

    let found = store.find_doctor_by_name("ANIL").await.unwrap().unwrap();
    assert_eq!(found.name, "Dr. Anil Kumar");
    assert!(store.find_doctor_by_name("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn status_filter_excludes_other_statuses() {
    let store = InMemoryClinicStore::new();
    let date = fixture_date();
    store.insert_appointment(NewAppointment::booked(1, 1, at(date, "09:00"))).await.unwrap();
    let mut done = NewAppointment::booked(1, 2, at(date, "10:00"));
    done.status = AppointmentStatus::Completed;
    store.insert_appointment(done).await.unwrap();

    let booked = store
        .appointments_between(AppointmentFilter::day(date).with_status(AppointmentStatus::Booked))
        .await
        .unwrap();
    assert_eq!(booked.len(), 1);
    assert_eq!(booked[0].slot_label(), "09:00");
}

#[tokio::test]
async fn symptom_count_matches_case_insensitively() {
    let store = InMemoryClinicStore::new();
    let date = fixture_date();

    for (email, symptoms, hour) in [
        ("a@example.com", "Fever and cough", "09:00"),
        ("b@example.com", "Annual checkup", "10:00"),
        ("c@example.com", "high FEVER", "11:00"),
    ] {
        let patient = store.insert_patient(NewPatient::from_email(email, Some(symptoms))).await.unwrap();
        store
            .insert_appointment(NewAppointment::booked(1, patient.id, at(date, hour)))
            .await
            .unwrap();
    }

    assert_eq!(store.count_appointments_with_symptom(None, "fever").await.unwrap(), 2);
    assert_eq!(store.count_appointments_with_symptom(Some(2), "fever").await.unwrap(), 0);
}

#[tokio::test]
async fn seeding_only_touches_an_empty_directory() {
    let store = InMemoryClinicStore::new();
    let today = fixture_date();

    let report = seed_directory(&store, today).await.unwrap();
    assert_eq!(report.doctors_added, 4);
    assert_eq!(report.patients_added, 3);

    let doctors = store.list_doctors().await.unwrap();
    assert!(doctors[0].availability.offers(today, "09:00"));
    assert!(doctors[0].availability.offers(today + chrono::Duration::days(13), "18:00"));
    assert!(!doctors[0].availability.has_date(today + chrono::Duration::days(14)));

    let again = seed_directory(&store, today).await.unwrap();
    assert_eq!(again.doctors_added, 0);
    assert_eq!(store.list_doctors().await.unwrap().len(), 4);
}
