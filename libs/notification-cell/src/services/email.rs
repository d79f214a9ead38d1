use async_trait::async_trait;
use tracing::info;

use crate::models::NotificationError;

#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait EmailNotifier: Send + Sync {
    async fn send_confirmation(&self, email: &str, subject: &str, body: &str) -> Result<bool, NotificationError>;
}

pub struct LoggingEmailNotifier;

#[async_trait]
impl EmailNotifier for LoggingEmailNotifier {
    async fn send_confirmation(&self, email: &str, subject: &str, body: &str) -> Result<bool, NotificationError> {
        info!("Email to {} | {} | {}", email, subject, body);
        Ok(true)
    }
}
