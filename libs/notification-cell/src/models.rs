use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of asking the calendar collaborator to hold a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub success: bool,
    pub event_id: Option<String>,
}

impl CalendarEvent {
    pub fn created(event_id: impl Into<String>) -> Self {
        Self {
            success: true,
            event_id: Some(event_id.into()),
        }
    }

    pub fn rejected() -> Self {
        Self {
            success: false,
            event_id: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Calendar service error: {0}")]
    Calendar(String),

    #[error("Email delivery error: {0}")]
    Email(String),

    #[error("Channel delivery error: {0}")]
    Channel(String),
}
