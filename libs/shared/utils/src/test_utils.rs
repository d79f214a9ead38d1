use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use shared_config::{AppConfig, StorageBackend};
use shared_models::{AvailabilityTemplate, NewDoctor};

/// Slots used by the seeded directory and most fixtures.
pub const STANDARD_SLOTS: [&str; 9] = [
    "09:00", "10:00", "11:00", "12:00", "14:00", "15:00", "16:00", "17:00", "18:00",
];

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub gemini_base_url: String,
    pub gemini_api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            gemini_base_url: "http://localhost:54322".to_string(),
            gemini_api_key: "test-gemini-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_supabase_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_gemini_url(url: &str) -> Self {
        Self {
            gemini_base_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            storage_backend: StorageBackend::Supabase,
            gemini_api_key: self.gemini_api_key.clone(),
            gemini_base_url: self.gemini_base_url.clone(),
            external_call_timeout_secs: 5,
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// A fixed day far enough in the future that relative parsing never touches it.
pub fn fixture_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 15).unwrap_or_default()
}

pub fn at(date: NaiveDate, label: &str) -> NaiveDateTime {
    let time = chrono::NaiveTime::parse_from_str(label, "%H:%M").unwrap_or_default();
    date.and_time(time)
}

pub fn doctor_fixture(name: &str, specialization: &str, date: NaiveDate, slots: &[&str]) -> NewDoctor {
    NewDoctor {
        name: name.to_string(),
        specialization: specialization.to_string(),
        availability: AvailabilityTemplate::new().with_day(date, slots.iter().copied()),
    }
}

/// Doctor with the standard slots on each of `days` consecutive dates.
pub fn doctor_with_days(name: &str, specialization: &str, start: NaiveDate, days: i64) -> NewDoctor {
    let availability = (0..days).fold(AvailabilityTemplate::new(), |template, offset| {
        template.with_day(start + Duration::days(offset), STANDARD_SLOTS)
    });

    NewDoctor {
        name: name.to_string(),
        specialization: specialization.to_string(),
        availability,
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn doctor_response(id: i64, name: &str, specialization: &str, availability: Value) -> Value {
        json!({
            "id": id,
            "name": name,
            "specialization": specialization,
            "availability": availability
        })
    }

    pub fn patient_response(id: i64, email: &str, symptoms: &str) -> Value {
        json!({
            "id": id,
            "name": email.split('@').next().unwrap_or(email),
            "email": email,
            "symptoms": symptoms
        })
    }

    pub fn appointment_response(id: i64, doctor_id: i64, patient_id: i64, time: &str, status: &str) -> Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "patient_id": patient_id,
            "appointment_time": time,
            "status": status
        })
    }

    pub fn unique_violation() -> Value {
        json!({
            "code": "23505",
            "details": "Key (doctor_id, appointment_time)=(1, 2030-01-15 14:00:00) already exists.",
            "hint": null,
            "message": "duplicate key value violates unique constraint \"appointments_booked_slot_key\""
        })
    }
}
