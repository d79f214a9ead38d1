pub mod availability;
pub mod doctor;
pub mod recommendation;

pub use availability::AvailabilityService;
pub use doctor::DoctorService;
pub use recommendation::RecommendationService;
