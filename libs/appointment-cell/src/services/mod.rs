pub mod booking;
pub mod conflict;
pub mod reporting;

pub use booking::BookingService;
pub use conflict::ConflictDetectionService;
pub use reporting::ReportingService;
