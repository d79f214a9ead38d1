// libs/notification-cell/src/services/calendar.rs
use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{CalendarEvent, NotificationError};

/// External calendar that mirrors every booking as an event.
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait CalendarScheduler: Send + Sync {
    async fn schedule(
        &self,
        doctor_name: &str,
        patient_email: &str,
        start_time: NaiveDateTime,
    ) -> Result<CalendarEvent, NotificationError>;

    /// Drop an event created by [`CalendarScheduler::schedule`].
    async fn release(&self, event_id: &str) -> Result<(), NotificationError>;
}

/// Calendar stand-in that accepts every request and logs it.
#[derive(Default)]
pub struct LoggingCalendarScheduler {
    events: Mutex<HashSet<String>>,
}

impl LoggingCalendarScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_events(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }
}

#[async_trait]
impl CalendarScheduler for LoggingCalendarScheduler {
    async fn schedule(
        &self,
        doctor_name: &str,
        patient_email: &str,
        start_time: NaiveDateTime,
    ) -> Result<CalendarEvent, NotificationError> {
        let event_id = format!("event-{}", Uuid::new_v4());
        info!(
            "Calendar event {} for {} with {} at {}",
            event_id, patient_email, doctor_name, start_time
        );

        self.events
            .lock()
            .map_err(|_| NotificationError::Calendar("event registry poisoned".to_string()))?
            .insert(event_id.clone());

        Ok(CalendarEvent::created(event_id))
    }

    async fn release(&self, event_id: &str) -> Result<(), NotificationError> {
        let removed = self
            .events
            .lock()
            .map_err(|_| NotificationError::Calendar("event registry poisoned".to_string()))?
            .remove(event_id);

        if removed {
            info!("Released calendar event {}", event_id);
        } else {
            warn!("Calendar event {} was not active", event_id);
        }
        Ok(())
    }
}
