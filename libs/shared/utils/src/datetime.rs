// libs/shared/utils/src/datetime.rs
//! Best-effort normalization of conversational dates and times.
//!
//! Dates resolve to [`NaiveDate`] and times to [`NaiveTime`]; the canonical
//! text forms are `YYYY-MM-DD` and zero-padded 24-hour `HH:MM`. Ambiguous
//! references ("friday", "may 3") resolve to the next occurrence on or after
//! the reference date, never to the past.

use std::sync::OnceLock;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime, Weekday};
use regex::{Captures, Regex};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateTimeError {
    #[error("Date format not recognized: {0}")]
    UnrecognizedDate(String),

    #[error("Time format not recognized: {0}")]
    UnrecognizedTime(String),
}

struct Patterns {
    iso_date: Regex,
    us_date: Regex,
    in_n_units: Regex,
    n_units_from_now: Regex,
    month_day: Regex,
    day_month: Regex,
    twelve_hour_minutes: Regex,
    twelve_hour: Regex,
    twenty_four_hour: Regex,
}

const MONTH: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        iso_date: compile(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})$"),
        us_date: compile(r"^(\d{1,2})/(\d{1,2})/(\d{4})$"),
        in_n_units: compile(r"^in\s+(\d+|a|an|one|two|three)\s+(days?|weeks?)$"),
        n_units_from_now: compile(r"^(\d+|a|an|one|two|three)\s+(days?|weeks?)\s+from\s+(?:now|today)$"),
        month_day: compile(&format!(
            r"^{MONTH}\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?(?:,?\s+(\d{{4}}))?$"
        )),
        day_month: compile(&format!(
            r"^(\d{{1,2}})(?:st|nd|rd|th)?(?:\s+of)?\s+{MONTH}\.?(?:,?\s+(\d{{4}}))?$"
        )),
        twelve_hour_minutes: compile(r"^(\d{1,2})[:.](\d{2})\s*(am|pm)$"),
        twelve_hour: compile(r"^(\d{1,2})\s*(am|pm)$"),
        twenty_four_hour: compile(r"^(\d{1,2}):(\d{2})$"),
    })
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("date/time pattern must be a valid regex")
}

// ==============================================================================
// DATES
// ==============================================================================

/// Normalize a date expression relative to the local current date.
pub fn normalize_date(text: &str) -> Result<NaiveDate, DateTimeError> {
    normalize_date_from(text, Local::now().date_naive())
}

/// Normalize a date expression relative to `today`.
pub fn normalize_date_from(text: &str, today: NaiveDate) -> Result<NaiveDate, DateTimeError> {
    let cleaned = clean_date_input(text);

    parse_numeric_date(&cleaned)
        .or_else(|| parse_relative_word(&cleaned, today))
        .or_else(|| parse_relative_offset(&cleaned, today))
        .or_else(|| parse_weekday(&cleaned, today))
        .or_else(|| parse_month_name_date(&cleaned, today))
        .ok_or_else(|| {
            debug!("No date pattern matched '{}'", cleaned);
            DateTimeError::UnrecognizedDate(text.trim().to_string())
        })
}

fn clean_date_input(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let mut cleaned = lowered
        .trim_end_matches(['.', ',', '!', '?'])
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    for prefix in ["on ", "this coming ", "coming "] {
        if let Some(rest) = cleaned.strip_prefix(prefix) {
            cleaned = rest.to_string();
        }
    }
    for suffix in [" morning", " afternoon", " evening", " night"] {
        if let Some(rest) = cleaned.strip_suffix(suffix) {
            cleaned = rest.to_string();
        }
    }

    cleaned
}

fn parse_numeric_date(input: &str) -> Option<NaiveDate> {
    let patterns = patterns();

    if let Some(caps) = patterns.iso_date.captures(input) {
        return NaiveDate::from_ymd_opt(number(&caps, 1)?, number(&caps, 2)?, number(&caps, 3)?);
    }

    if let Some(caps) = patterns.us_date.captures(input) {
        return NaiveDate::from_ymd_opt(number(&caps, 3)?, number(&caps, 1)?, number(&caps, 2)?);
    }

    None
}

fn parse_relative_word(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let offset = match input {
        "today" | "tonight" | "now" => 0,
        "tomorrow" | "tmrw" => 1,
        "day after tomorrow" | "the day after tomorrow" => 2,
        "yesterday" => -1,
        "next week" => 7,
        _ => return None,
    };

    today.checked_add_signed(Duration::days(offset))
}

fn parse_relative_offset(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let patterns = patterns();
    let caps = patterns
        .in_n_units
        .captures(input)
        .or_else(|| patterns.n_units_from_now.captures(input))?;

    let amount: i64 = match &caps[1] {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        digits => digits.parse().ok()?,
    };
    let days = if caps[2].starts_with("week") { amount.checked_mul(7)? } else { amount };

    today.checked_add_signed(Duration::try_days(days)?)
}

fn parse_weekday(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let (strictly_after_today, name) = if let Some(rest) = input.strip_prefix("next ") {
        (true, rest)
    } else if let Some(rest) = input.strip_prefix("this ") {
        (false, rest)
    } else {
        (false, input)
    };

    let target = weekday_from_name(name.trim())?;
    let current = i64::from(today.weekday().num_days_from_monday());
    let wanted = i64::from(target.num_days_from_monday());

    let mut days_ahead = (wanted - current).rem_euclid(7);
    if strictly_after_today && days_ahead == 0 {
        days_ahead = 7;
    }

    today.checked_add_signed(Duration::days(days_ahead))
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    let weekday = match name {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tue" | "tues" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thu" | "thur" | "thurs" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

fn parse_month_name_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let patterns = patterns();

    let (month, day, year) = if let Some(caps) = patterns.month_day.captures(input) {
        (month_from_name(&caps[1])?, number(&caps, 2)?, caps.get(3))
    } else if let Some(caps) = patterns.day_month.captures(input) {
        (month_from_name(&caps[2])?, number(&caps, 1)?, caps.get(3))
    } else {
        return None;
    };

    match year {
        Some(year) => NaiveDate::from_ymd_opt(year.as_str().parse().ok()?, month, day),
        None => {
            let this_year = NaiveDate::from_ymd_opt(today.year(), month, day);
            match this_year {
                Some(date) if date >= today => Some(date),
                _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
            }
        }
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn number<T: std::str::FromStr>(caps: &Captures<'_>, group: usize) -> Option<T> {
    caps.get(group)?.as_str().parse().ok()
}

// ==============================================================================
// TIMES
// ==============================================================================

/// Normalize a time expression.
///
/// Interpretations are tried in a fixed order: 12-hour with minutes, 12-hour
/// hour only, then 24-hour. The first that parses wins.
pub fn normalize_time(text: &str) -> Result<NaiveTime, DateTimeError> {
    let patterns = patterns();
    let cleaned = clean_time_input(text);

    let parsed = patterns
        .twelve_hour_minutes
        .captures(&cleaned)
        .and_then(|caps| twelve_hour(number(&caps, 1)?, number(&caps, 2)?, &caps[3]))
        .or_else(|| {
            patterns
                .twelve_hour
                .captures(&cleaned)
                .and_then(|caps| twelve_hour(number(&caps, 1)?, 0, &caps[2]))
        })
        .or_else(|| {
            patterns
                .twenty_four_hour
                .captures(&cleaned)
                .and_then(|caps| NaiveTime::from_hms_opt(number(&caps, 1)?, number(&caps, 2)?, 0))
        });

    parsed.ok_or_else(|| DateTimeError::UnrecognizedTime(text.trim().to_string()))
}

/// Zero-padded 24-hour `HH:MM` label of a time expression.
pub fn canonical_time_label(text: &str) -> Result<String, DateTimeError> {
    normalize_time(text).map(|time| time.format("%H:%M").to_string())
}

fn clean_time_input(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .replace("a.m.", "am")
        .replace("p.m.", "pm")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn twelve_hour(hour: u32, minute: u32, meridiem: &str) -> Option<NaiveTime> {
    if !(1..=12).contains(&hour) {
        return None;
    }

    let hour = match (meridiem, hour) {
        ("am", 12) => 0,
        ("am", h) => h,
        ("pm", 12) => 12,
        ("pm", h) => h + 12,
        _ => return None,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tuesday
    fn reference_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 15).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn iso_and_numeric_dates() {
        let today = reference_day();
        assert_eq!(normalize_date_from("2024-05-01", today).unwrap(), date(2024, 5, 1));
        assert_eq!(normalize_date_from("2031/02/03", today).unwrap(), date(2031, 2, 3));
        assert_eq!(normalize_date_from("05/01/2030", today).unwrap(), date(2030, 5, 1));
        assert!(normalize_date_from("2030-02-30", today).is_err());
    }

    #[test]
    fn relative_words() {
        let today = reference_day();
        assert_eq!(normalize_date_from("Today", today).unwrap(), today);
        assert_eq!(normalize_date_from("tomorrow", today).unwrap(), date(2030, 1, 16));
        assert_eq!(normalize_date_from("tomorrow afternoon", today).unwrap(), date(2030, 1, 16));
        assert_eq!(normalize_date_from("the day after tomorrow", today).unwrap(), date(2030, 1, 17));
        assert_eq!(normalize_date_from("in 2 weeks", today).unwrap(), date(2030, 1, 29));
        assert_eq!(normalize_date_from("3 days from now", today).unwrap(), date(2030, 1, 18));
    }

    #[test]
    fn weekdays_resolve_forward() {
        let today = reference_day();
        assert_eq!(normalize_date_from("friday", today).unwrap(), date(2030, 1, 18));
        assert_eq!(normalize_date_from("on Fri.", today).unwrap(), date(2030, 1, 18));
        assert_eq!(normalize_date_from("monday", today).unwrap(), date(2030, 1, 21));
        assert_eq!(normalize_date_from("tuesday", today).unwrap(), today);
        assert_eq!(normalize_date_from("next tuesday", today).unwrap(), date(2030, 1, 22));
        assert_eq!(normalize_date_from("next Friday", today).unwrap(), date(2030, 1, 18));
    }

    #[test]
    fn relative_expressions_never_resolve_to_the_past() {
        let today = reference_day();
        let expressions = [
            "today", "tomorrow", "monday", "tuesday", "wednesday", "thursday",
            "friday", "saturday", "sunday", "next monday", "this sunday",
        ];
        for expression in expressions {
            let resolved = normalize_date_from(expression, today).unwrap();
            assert!(resolved >= today, "{expression} resolved to {resolved}");
        }
    }

    #[test]
    fn month_names_roll_into_next_year_when_passed() {
        let today = reference_day();
        assert_eq!(normalize_date_from("May 1", today).unwrap(), date(2030, 5, 1));
        assert_eq!(normalize_date_from("1st of May", today).unwrap(), date(2030, 5, 1));
        assert_eq!(normalize_date_from("january 3rd", today).unwrap(), date(2031, 1, 3));
        assert_eq!(normalize_date_from("Jan 3, 2030", today).unwrap(), date(2030, 1, 3));
    }

    #[test]
    fn unrecognized_date_echoes_input() {
        let err = normalize_date_from("  whenever works ", reference_day()).unwrap_err();
        assert_eq!(err, DateTimeError::UnrecognizedDate("whenever works".to_string()));
        assert_eq!(err.to_string(), "Date format not recognized: whenever works");
    }

    #[test]
    fn oversized_offsets_are_unrecognized() {
        let today = reference_day();
        assert_eq!(
            normalize_date_from("in 200000000000000 days", today),
            Err(DateTimeError::UnrecognizedDate("in 200000000000000 days".to_string()))
        );
        assert!(normalize_date_from("in 9000000000000000000 weeks", today).is_err());
        assert!(normalize_date_from("99999999999999999999 days from now", today).is_err());
    }

    #[test]
    fn twelve_and_twenty_four_hour_forms_agree() {
        for input in ["5 PM", "5pm", "5:00 pm", "5:00PM", "17:00", "5 p.m."] {
            assert_eq!(canonical_time_label(input).unwrap(), "17:00", "input {input}");
        }
        assert_eq!(canonical_time_label("9am").unwrap(), "09:00");
        assert_eq!(canonical_time_label("9:30").unwrap(), "09:30");
        assert_eq!(canonical_time_label("12 am").unwrap(), "00:00");
        assert_eq!(canonical_time_label("12:15pm").unwrap(), "12:15");
    }

    #[test]
    fn invalid_times_are_rejected() {
        for input in ["17:00 pm", "13pm", "25:00", "noonish", ""] {
            assert!(normalize_time(input).is_err(), "input {input}");
        }
        assert_eq!(
            normalize_time("half past").unwrap_err(),
            DateTimeError::UnrecognizedTime("half past".to_string())
        );
    }
}
