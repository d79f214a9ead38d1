pub mod calendar;
pub mod channel;
pub mod email;

pub use calendar::{CalendarScheduler, LoggingCalendarScheduler};
pub use channel::{ChannelNotifier, LoggingChannelNotifier};
pub use email::{EmailNotifier, LoggingEmailNotifier};

#[cfg(feature = "mocks")]
pub use calendar::MockCalendarScheduler;
#[cfg(feature = "mocks")]
pub use channel::MockChannelNotifier;
#[cfg(feature = "mocks")]
pub use email::MockEmailNotifier;
