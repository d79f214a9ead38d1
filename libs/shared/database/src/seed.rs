// libs/shared/database/src/seed.rs
use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

use shared_models::{AvailabilityTemplate, NewDoctor, NewPatient};

use crate::store::{ClinicStore, StoreError};

pub const SEED_DAYS: i64 = 14;

pub const SEED_SLOTS: [&str; 9] = [
    "09:00", "10:00", "11:00", "12:00", "14:00", "15:00", "16:00", "17:00", "18:00",
];

const SEED_DOCTORS: [(&str, &str); 4] = [
    ("Dr. Ravi Ahuja", "Cardiologist"),
    ("Dr. Priya Sharma", "Dermatologist"),
    ("Dr. Anil Kumar", "Pediatrician"),
    ("Dr. Sunita Desai", "General Physician"),
];

const SEED_PATIENTS: [(&str, &str, &str); 3] = [
    ("Sandeep Madwal", "sandeep.madwal2007@gmail.com", "Fever and cough"),
    ("Jane Smith", "jane.smith@example.com", "Annual checkup"),
    ("Amit Singh", "amit.singh@example.com", "Headache"),
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub doctors_added: usize,
    pub patients_added: usize,
}

fn seed_template(today: NaiveDate) -> AvailabilityTemplate {
    (0..SEED_DAYS).fold(AvailabilityTemplate::new(), |template, offset| {
        template.with_day(today + Duration::days(offset), SEED_SLOTS)
    })
}

/// Load the demo directory when no doctors exist yet.
///
/// Doctors get the standard slots for `today` and the following 13 days.
/// Patients already present by email are left alone.
pub async fn seed_directory(store: &dyn ClinicStore, today: NaiveDate) -> Result<SeedReport, StoreError> {
    if !store.list_doctors().await?.is_empty() {
        info!("Doctor directory already populated, skipping seed");
        return Ok(SeedReport::default());
    }

    let mut report = SeedReport::default();
    let availability = seed_template(today);

    for (name, specialization) in SEED_DOCTORS {
        store
            .insert_doctor(NewDoctor {
                name: name.to_string(),
                specialization: specialization.to_string(),
                availability: availability.clone(),
            })
            .await?;
        report.doctors_added += 1;
    }

    for (name, email, symptoms) in SEED_PATIENTS {
        if store.find_patient_by_email(email).await?.is_some() {
            debug!("Seed patient {} already present", email);
            continue;
        }
        store
            .insert_patient(NewPatient {
                name: name.to_string(),
                email: email.to_string(),
                symptoms: Some(symptoms.to_string()),
            })
            .await?;
        report.patients_added += 1;
    }

    info!(
        "Seeded {} doctors and {} patients starting {}",
        report.doctors_added, report.patients_added, today
    );
    Ok(report)
}
