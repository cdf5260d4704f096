//! Field value classification.
//!
//! Classification runs in two passes. A loose probe decides which type a value
//! plausibly is (date, then phone, then email, else text). For dates and phones a
//! strict check then confirms the canonical format; a value that probes as one of
//! those types but is not canonical is rejected instead of being downgraded to text.

use crate::domain::form::field_type::FieldType;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

pub const DATE_FORMAT_HINT: &str = "Invalid date format. Use DD.MM.YYYY or YYYY-MM-DD.";
pub const PHONE_FORMAT_HINT: &str = "Invalid phone format. Use +7 XXX XXX XX XX";

const MONTHS: &[&str] = &[
    "jan", "january", "feb", "february", "mar", "march", "apr", "april", "may", "jun", "june",
    "jul", "july", "aug", "august", "sep", "sept", "september", "oct", "october", "nov",
    "november", "dec", "december",
];

const WEEKDAYS: &[&str] = &[
    "mon", "monday", "tue", "tues", "tuesday", "wed", "wednesday", "thu", "thur", "thurs",
    "thursday", "fri", "friday", "sat", "saturday", "sun", "sunday",
];

const FILLER_WORDS: &[&str] = &["of", "at", "on", "the", "am", "pm", "a.m", "p.m", "utc", "gmt"];

/// A value that probed as a date or phone but failed the canonical format check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Value '{value}' is not valid. {}", DATE_FORMAT_HINT)]
    InvalidDate { value: String },
    #[error("Value '{value}' is not valid. {}", PHONE_FORMAT_HINT)]
    InvalidPhone { value: String },
}

impl ValidationError {
    pub fn value(&self) -> &str {
        match self {
            ValidationError::InvalidDate { value } | ValidationError::InvalidPhone { value } => value,
        }
    }
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("built-in classifier pattern must compile"))
}

fn numeric_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"^\d{1,4}([./-])\d{1,2}([./-])\d{1,4}(?:[T ]\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?$",
    )
}

fn time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?i)^\d{1,2}:\d{2}(?::\d{2})?(?:\s*[ap]\.?m\.?)?$")
}

fn canonical_dotted_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^\d{2}\.\d{2}\.\d{4}$")
}

fn canonical_iso_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^\d{4}-\d{2}-\d{2}$")
}

fn phone_shape_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Optional country/trunk prefix, optional parenthesized area code, then groups of
    // at least two digits separated by a single space or dash.
    regex(
        &RE,
        r"^(?:\+?\d{1,3}[ -]?)?(?:\(\d{2,5}\)[ -]?)?\d{2,}(?:[ -]\d{2,})*$",
    )
}

fn canonical_phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^\+7 \d{3} \d{3} \d{2} \d{2}$")
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Local part may be empty.
    regex(
        &RE,
        r"^(?:[\p{L}\p{N}!#$%&'*+/=?^_`{|}~-]+(?:\.[\p{L}\p{N}!#$%&'*+/=?^_`{|}~-]+)*)?@(?:[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?\.)+\p{L}(?:[\p{L}\p{N}-]*[\p{L}\p{N}])?$",
    )
}

/// Loose probe: is this value plausibly a calendar date (or date-time)?
pub fn looks_like_date(value: &str) -> bool {
    let v = value.trim();
    if v.is_empty() {
        return false;
    }
    if numeric_date_re().is_match(v) || time_re().is_match(v) {
        return true;
    }
    if v.len() == 8 && v.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(v, "%Y%m%d").is_ok();
    }
    looks_like_textual_date(v)
}

/// Dates spelled with month names, e.g. `March 3rd, 2024` or `Mon, 5 Feb 2024 10:00`.
///
/// Every token must be a number, an ordinal, a clock time, a month or weekday name, or a
/// connective; at least one month name and one number are required.
fn looks_like_textual_date(v: &str) -> bool {
    let lower = v.to_lowercase();
    let mut has_month = false;
    let mut has_number = false;

    for token in lower.split(|c: char| c.is_whitespace() || matches!(c, ',' | '/' | '-')) {
        let token = token.trim_end_matches('.');
        if token.is_empty() {
            continue;
        }
        if token.bytes().all(|b| b.is_ascii_digit()) {
            has_number = true;
            continue;
        }
        if is_ordinal(token) {
            has_number = true;
            continue;
        }
        if time_re().is_match(token) {
            continue;
        }
        if MONTHS.contains(&token) {
            has_month = true;
            continue;
        }
        if WEEKDAYS.contains(&token) || FILLER_WORDS.contains(&token) {
            continue;
        }
        return false;
    }

    has_month && has_number
}

fn is_ordinal(token: &str) -> bool {
    let digits = token.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    let suffix = &token[digits.len()..];
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && matches!(suffix, "st" | "nd" | "rd" | "th")
}

/// Loose probe: does this value parse as some telephone number?
///
/// Accepts phone-style digit grouping only (no `.` separators, no single-digit groups
/// after the prefix). International numbers (`+...`) need 7 to 15 digits, the E.164
/// range; national numbers need at least 10 so that they carry an area code.
pub fn looks_like_phone(value: &str) -> bool {
    let v = value.trim();
    if !phone_shape_re().is_match(v) {
        return false;
    }
    let digits = v.chars().filter(|c| c.is_ascii_digit()).count();
    if v.starts_with('+') {
        (7..=15).contains(&digits)
    } else {
        (10..=15).contains(&digits)
    }
}

/// Email address syntax check. An empty local part is tolerated.
pub fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    if local.chars().count() > 64 || domain.chars().count() > 253 {
        return false;
    }
    email_re().is_match(value)
}

/// Strict check for dates: `DD.MM.YYYY` or `YYYY-MM-DD` naming a real calendar day.
pub fn is_canonical_date(value: &str) -> bool {
    if canonical_dotted_date_re().is_match(value) {
        return NaiveDate::parse_from_str(value, "%d.%m.%Y").is_ok();
    }
    if canonical_iso_date_re().is_match(value) {
        return NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
    }
    false
}

/// Strict check for phones: exactly `+7 XXX XXX XX XX`.
pub fn is_canonical_phone(value: &str) -> bool {
    canonical_phone_re().is_match(value)
}

/// First-match-wins probe without strict validation. Total: falls back to `Text`.
pub fn probe(value: &str) -> FieldType {
    if looks_like_date(value) {
        FieldType::Date
    } else if looks_like_phone(value) {
        FieldType::Phone
    } else if is_email(value) {
        FieldType::Email
    } else {
        FieldType::Text
    }
}

/// Classifies a raw value, rejecting date- or phone-shaped values that are not canonical.
pub fn classify(value: &str) -> Result<FieldType, ValidationError> {
    let field_type = probe(value);
    match field_type {
        FieldType::Date if !is_canonical_date(value) => Err(ValidationError::InvalidDate {
            value: value.to_string(),
        }),
        FieldType::Phone if !is_canonical_phone(value) => Err(ValidationError::InvalidPhone {
            value: value.to_string(),
        }),
        other => Ok(other),
    }
}
