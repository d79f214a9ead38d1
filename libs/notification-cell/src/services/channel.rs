use async_trait::async_trait;
use tracing::info;

use crate::models::NotificationError;

/// Team chat channel that receives doctor reports.
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait ChannelNotifier: Send + Sync {
    async fn send_channel_report(&self, doctor_name: &str, report: &str) -> Result<bool, NotificationError>;
}

pub struct LoggingChannelNotifier;

#[async_trait]
impl ChannelNotifier for LoggingChannelNotifier {
    async fn send_channel_report(&self, doctor_name: &str, report: &str) -> Result<bool, NotificationError> {
        info!("Channel report for {}:\n{}", doctor_name, report);
        Ok(true)
    }
}
