// libs/shared/models/src/clinic.rs
use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";
pub const SLOT_LABEL_FORMAT: &str = "%H:%M";

/// Symptom text stored for patients who did not describe any.
pub const SYMPTOMS_NOT_PROVIDED: &str = "Not provided";

// ==============================================================================
// DOCTORS
// ==============================================================================

/// Declared slots per calendar date, keyed by `YYYY-MM-DD`.
///
/// Slot labels are `HH:MM` strings kept in the order they were declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityTemplate(BTreeMap<String, Vec<String>>);

impl AvailabilityTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day<I, S>(mut self, date: NaiveDate, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = Vec::new();
        for slot in slots {
            let slot = slot.into();
            if !labels.contains(&slot) {
                labels.push(slot);
            }
        }
        self.0.insert(date.format(DATE_KEY_FORMAT).to_string(), labels);
        self
    }

    /// Slots declared for `date`; empty when the date has no entry.
    pub fn slots_on(&self, date: NaiveDate) -> &[String] {
        self.0
            .get(&date.format(DATE_KEY_FORMAT).to_string())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_date(&self, date: NaiveDate) -> bool {
        self.0.contains_key(&date.format(DATE_KEY_FORMAT).to_string())
    }

    pub fn offers(&self, date: NaiveDate, label: &str) -> bool {
        self.slots_on(date).iter().any(|slot| slot == label)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialization: String,
    #[serde(default)]
    pub availability: AvailabilityTemplate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDoctor {
    pub name: String,
    pub specialization: String,
    pub availability: AvailabilityTemplate,
}

/// Public projection returned by the doctor listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub id: i64,
    pub name: String,
    pub specialization: String,
}

impl From<&Doctor> for DoctorSummary {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name.clone(),
            specialization: doctor.specialization.clone(),
        }
    }
}

// ==============================================================================
// PATIENTS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub symptoms: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub email: String,
    pub symptoms: Option<String>,
}

impl NewPatient {
    /// Patient record derived from an email address alone.
    pub fn from_email(email: &str, symptoms: Option<&str>) -> Self {
        let name = email.split('@').next().unwrap_or(email).to_string();
        let symptoms = symptoms
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(SYMPTOMS_NOT_PROVIDED)
            .to_string();

        Self {
            name,
            email: email.to_string(),
            symptoms: Some(symptoms),
        }
    }
}

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Booked,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Booked => "booked",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub appointment_time: NaiveDateTime,
    pub status: AppointmentStatus,
}

impl Appointment {
    /// `HH:MM` label of the slot this appointment occupies.
    pub fn slot_label(&self) -> String {
        self.appointment_time.format(SLOT_LABEL_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub doctor_id: i64,
    pub patient_id: i64,
    pub appointment_time: NaiveDateTime,
    pub status: AppointmentStatus,
}

impl NewAppointment {
    pub fn booked(doctor_id: i64, patient_id: i64, appointment_time: NaiveDateTime) -> Self {
        Self {
            doctor_id,
            patient_id,
            appointment_time,
            status: AppointmentStatus::Booked,
        }
    }
}
