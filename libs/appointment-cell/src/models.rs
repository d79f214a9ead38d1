use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use doctor_cell::DoctorError;
use notification_cell::{CalendarScheduler, ChannelNotifier, EmailNotifier};
use shared_database::{ClinicStore, StoreError};
use shared_models::DATE_KEY_FORMAT;
use shared_utils::{titled_name, DateTimeError};

/// Shared state for the appointment and booking routes.
pub struct AppointmentCellState {
    pub store: Arc<dyn ClinicStore>,
    pub calendar: Arc<dyn CalendarScheduler>,
    pub email: Arc<dyn EmailNotifier>,
    pub channel: Arc<dyn ChannelNotifier>,
}

// ==============================================================================
// BOOKING
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    /// A name fragment, or any text containing "any" to take the first free doctor.
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    #[serde(alias = "patient_email")]
    pub email: String,
    #[serde(default)]
    pub symptoms: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    Success {
        appointment_id: i64,
        doctor_name: String,
        date: NaiveDate,
        time: String,
    },
    DateTimeUnrecognized(DateTimeError),
    DoctorNotFound { query: String },
    NoDoctorAvailable { date: NaiveDate, time: String },
    SlotConflict {
        doctor_name: String,
        date: NaiveDate,
        time: String,
    },
    CalendarSchedulingFailed,
}

impl BookingOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            BookingOutcome::Success { .. } => "success",
            BookingOutcome::DateTimeUnrecognized(_) => "date_time_unrecognized",
            BookingOutcome::DoctorNotFound { .. } => "doctor_not_found",
            BookingOutcome::NoDoctorAvailable { .. } => "no_doctor_available",
            BookingOutcome::SlotConflict { .. } => "slot_conflict",
            BookingOutcome::CalendarSchedulingFailed => "calendar_scheduling_failed",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BookingOutcome::Success { .. })
    }
}

impl fmt::Display for BookingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingOutcome::Success { doctor_name, date, time, .. } => write!(
                f,
                "Success! Your appointment is booked with {} on {} at {}.",
                doctor_name,
                date.format(DATE_KEY_FORMAT),
                time
            ),
            BookingOutcome::DateTimeUnrecognized(err) => write!(
                f,
                "I'm sorry, I couldn't understand the date or time you provided: {}",
                err
            ),
            BookingOutcome::DoctorNotFound { query } => write!(f, "Doctor '{}' not found.", query),
            BookingOutcome::NoDoctorAvailable { date, time } => write!(
                f,
                "I'm sorry, but no doctors are available on {} at {}.",
                date.format(DATE_KEY_FORMAT),
                time
            ),
            BookingOutcome::SlotConflict { doctor_name, date, time } => write!(
                f,
                "I'm sorry, but {} is already booked at {} on {}.",
                titled_name(doctor_name),
                time,
                date.format(DATE_KEY_FORMAT)
            ),
            BookingOutcome::CalendarSchedulingFailed => write!(f, "Failed to book on the calendar."),
        }
    }
}

// ==============================================================================
// REPORTING
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Today,
    Yesterday,
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportPeriod::Today => f.write_str("today"),
            ReportPeriod::Yesterday => f.write_str("yesterday"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub appointment_time: NaiveDateTime,
    pub patient_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    DoctorNotFound { query: String },
    DayListing {
        period: ReportPeriod,
        entries: Vec<ReportEntry>,
    },
    SymptomCount { symptom: String, count: u64 },
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::DoctorNotFound { query } => write!(f, "Could not find doctor: {}", query),
            Report::DayListing { period, entries } if entries.is_empty() => {
                write!(f, "You had no appointments {}.", period)
            }
            Report::DayListing { period, entries } => {
                write!(f, "You have {} appointment(s) {}:", entries.len(), period)?;
                for entry in entries {
                    write!(
                        f,
                        "\n- At {} with patient: {}",
                        entry.appointment_time.format("%I:%M %p"),
                        entry.patient_email.as_deref().unwrap_or("Unknown")
                    )?;
                }
                Ok(())
            }
            Report::SymptomCount { symptom, count } => write!(
                f,
                "Found {} patient(s) with symptoms related to '{}'.",
                count, symptom
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShareReportRequest {
    pub query: String,
    pub doctor_name: String,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<StoreError> for AppointmentError {
    fn from(err: StoreError) -> Self {
        AppointmentError::Database(err.to_string())
    }
}

impl From<DoctorError> for AppointmentError {
    fn from(err: DoctorError) -> Self {
        AppointmentError::Database(err.to_string())
    }
}
