use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared_database::{ClinicStore, StoreError};
use shared_models::{DoctorSummary, DATE_KEY_FORMAT};
use shared_utils::{titled_name, DateTimeError};

/// Shared state for the doctor routes.
pub struct DoctorCellState {
    pub store: Arc<dyn ClinicStore>,
}

impl DoctorCellState {
    pub fn new(store: Arc<dyn ClinicStore>) -> Self {
        Self { store }
    }
}

// ==============================================================================
// SCHEDULE
// ==============================================================================

/// Result of a schedule lookup for one doctor on one day.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleOutcome {
    /// Free slots in template order; empty when every declared slot is booked.
    Slots {
        doctor: DoctorSummary,
        date: NaiveDate,
        slots: Vec<String>,
    },
    /// The template has no entry for the date.
    NoAvailability { doctor: DoctorSummary, date: NaiveDate },
    DoctorNotFound { query: String },
    DateUnrecognized(DateTimeError),
}

impl fmt::Display for ScheduleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleOutcome::Slots { doctor, date, slots } if slots.is_empty() => write!(
                f,
                "{} is fully booked on {}.",
                titled_name(&doctor.name),
                date.format(DATE_KEY_FORMAT)
            ),
            ScheduleOutcome::Slots { doctor, date, slots } => write!(
                f,
                "{} has the following slots free on {}: {}",
                titled_name(&doctor.name),
                date.format(DATE_KEY_FORMAT),
                slots.join(", ")
            ),
            ScheduleOutcome::NoAvailability { doctor, date } => write!(
                f,
                "{} has no availability on {}.",
                titled_name(&doctor.name),
                date.format(DATE_KEY_FORMAT)
            ),
            ScheduleOutcome::DoctorNotFound { query } => write!(f, "Doctor '{}' not found.", query),
            ScheduleOutcome::DateUnrecognized(err) => write!(
                f,
                "I'm sorry, I couldn't understand the date you provided: {}",
                err
            ),
        }
    }
}

/// Wire form of a schedule lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub doctor: Option<String>,
    pub date: Option<String>,
    pub available_slots: Vec<String>,
    pub message: String,
}

impl From<&ScheduleOutcome> for ScheduleResponse {
    fn from(outcome: &ScheduleOutcome) -> Self {
        let (doctor, date, available_slots) = match outcome {
            ScheduleOutcome::Slots { doctor, date, slots } => {
                (Some(doctor.name.clone()), Some(*date), slots.clone())
            }
            ScheduleOutcome::NoAvailability { doctor, date } => (Some(doctor.name.clone()), Some(*date), Vec::new()),
            _ => (None, None, Vec::new()),
        };

        Self {
            doctor,
            date: date.map(|d| d.format(DATE_KEY_FORMAT).to_string()),
            available_slots,
            message: outcome.to_string(),
        }
    }
}

// ==============================================================================
// RECOMMENDATION
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    Recommended(String),
    /// A keyword matched but no doctor carries the specialization.
    Unavailable(String),
    NoMatch,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Recommended(spec) => write!(f, "For that symptom, I recommend a {}.", spec),
            Recommendation::Unavailable(spec) => write!(
                f,
                "I would normally recommend a {}, but none are available. I can look for a General Physician.",
                spec
            ),
            Recommendation::NoMatch => write!(f, "I can look for a General Physician for you for that symptom."),
        }
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug)]
pub enum DoctorError {
    NotFound(String),
    Storage(StoreError),
}

impl fmt::Display for DoctorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoctorError::NotFound(query) => write!(f, "Doctor '{}' not found.", query),
            DoctorError::Storage(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DoctorError {}

impl From<StoreError> for DoctorError {
    fn from(err: StoreError) -> Self {
        DoctorError::Storage(err)
    }
}
