// libs/shared/utils/src/names.rs
//! Helpers for the loose doctor-name queries users and the assistant send.

/// Drop a leading "Dr." / "Dr" / "Doctor" title from a name query.
pub fn strip_doctor_title(query: &str) -> &str {
    let trimmed = query.trim();

    for title in ["doctor ", "dr. ", "dr.", "dr "] {
        let has_title = trimmed
            .get(..title.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(title));
        if has_title {
            return trimmed[title.len()..].trim();
        }
    }

    trimmed
}

/// Display form with a single "Dr." title, whether or not the stored name has one.
pub fn titled_name(name: &str) -> String {
    format!("Dr. {}", strip_doctor_title(name))
}

/// Whether a doctor selector asks for any available doctor.
///
/// Containment, not equality: "any", "Any doctor" and "anyone" all qualify,
/// and so does any name that happens to contain the letters "any".
pub fn is_any_doctor_selector(selector: &str) -> bool {
    selector.to_lowercase().contains("any")
}
