//! Storage port for doctors, patients and appointments.
//!
//! The [`ClinicStore`] trait is the only way the cells reach persistent
//! state. Adapters must enforce two uniqueness rules and report violations
//! as [`StoreError::Conflict`]:
//!
//! - at most one `booked` appointment per (doctor, timestamp);
//! - at most one patient per email.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use shared_models::{
    Appointment, AppointmentStatus, Doctor, NewAppointment, NewDoctor, NewPatient, Patient,
};

use crate::supabase::SupabaseError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Malformed record: {0}")]
    Malformed(String),
}

impl From<SupabaseError> for StoreError {
    fn from(err: SupabaseError) -> Self {
        match err {
            SupabaseError::UniqueViolation(detail) => StoreError::Conflict(detail),
            SupabaseError::Decode(e) => StoreError::Malformed(e.to_string()),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Half-open timestamp range `[from, to)` over appointments.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentFilter {
    pub doctor_id: Option<i64>,
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentFilter {
    /// Every appointment within the 24 hours of `date`.
    pub fn day(date: NaiveDate) -> Self {
        let from = date.and_time(NaiveTime::MIN);
        Self {
            doctor_id: None,
            from,
            to: from + Duration::days(1),
            status: None,
        }
    }

    pub fn for_doctor(mut self, doctor_id: i64) -> Self {
        self.doctor_id = Some(doctor_id);
        self
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.doctor_id.map_or(true, |id| appointment.doctor_id == id)
            && self.status.map_or(true, |status| appointment.status == status)
            && appointment.appointment_time >= self.from
            && appointment.appointment_time < self.to
    }
}

#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait ClinicStore: Send + Sync {
    /// All doctors in storage order (ascending id).
    async fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError>;

    /// First doctor, in storage order, whose name contains `fragment`
    /// case-insensitively.
    async fn find_doctor_by_name(&self, fragment: &str) -> Result<Option<Doctor>, StoreError>;

    async fn find_doctor_by_specialization(&self, specialization: &str) -> Result<Option<Doctor>, StoreError>;

    async fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError>;

    async fn find_patient(&self, patient_id: i64) -> Result<Option<Patient>, StoreError>;

    async fn find_patient_by_email(&self, email: &str) -> Result<Option<Patient>, StoreError>;

    async fn insert_patient(&self, patient: NewPatient) -> Result<Patient, StoreError>;

    /// The `booked` appointment holding the doctor's slot at exactly `at`.
    async fn find_booked_appointment(
        &self,
        doctor_id: i64,
        at: NaiveDateTime,
    ) -> Result<Option<Appointment>, StoreError>;

    /// Appointments matching `filter`, ordered by timestamp ascending.
    async fn appointments_between(&self, filter: AppointmentFilter) -> Result<Vec<Appointment>, StoreError>;

    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<Appointment, StoreError>;

    /// Appointments of any status whose patient's symptoms contain
    /// `fragment` case-insensitively.
    async fn count_appointments_with_symptom(
        &self,
        doctor_id: Option<i64>,
        fragment: &str,
    ) -> Result<u64, StoreError>;
}
