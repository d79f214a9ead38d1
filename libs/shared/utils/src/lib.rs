pub mod datetime;
pub mod names;
pub mod test_utils;

pub use datetime::{
    canonical_time_label, normalize_date, normalize_date_from, normalize_time,
    DateTimeError,
};
pub use names::{is_any_doctor_selector, strip_doctor_title, titled_name};
