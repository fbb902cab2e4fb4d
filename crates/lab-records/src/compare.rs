//! Type-aware value ordering
//!
//! Raw data mixes real numbers with numeric strings and real dates with
//! ISO-formatted strings. [`compare_values`] classifies both sides first and
//! orders them by class:
//!
//! 1. empty values
//! 2. numbers (including numeric strings)
//! 3. dates (including ISO date and date-time strings)
//! 4. everything else, compared as text ignoring case

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::{FieldValue, DATE_FORMAT};

static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(\d+(\.\d*)?|\.\d+)([eE][-+]?\d+)?$").expect("numeric pattern is valid")
});

static ISO_DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("date pattern is valid"));

/// Sort class of a value
#[derive(Debug, Clone, PartialEq)]
pub enum SortClass {
    /// Null, blank text, empty list/object
    Empty,
    /// Numeric value
    Number(f64),
    /// Chronological value
    Date(NaiveDateTime),
    /// Anything else, by its display text
    Text(String),
}

impl SortClass {
    /// Classify a value for ordering
    #[must_use]
    pub fn of(value: &FieldValue) -> Self {
        if value.is_empty() {
            return Self::Empty;
        }
        match value {
            FieldValue::Number(n) => Self::Number(*n),
            FieldValue::Date(d) => Self::Date(d.and_time(chrono::NaiveTime::MIN)),
            FieldValue::Text(s) => classify_text(s.trim()),
            other => Self::Text(other.to_string()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Number(_) => 1,
            Self::Date(_) => 2,
            Self::Text(_) => 3,
        }
    }
}

/// Check whether a string reads as a plain decimal number
#[must_use]
pub fn is_numeric_text(s: &str) -> bool {
    NUMERIC.is_match(s.trim())
}

/// Parse an ISO-8601 date or date-time string
#[must_use]
pub fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if !ISO_DATE_PREFIX.is_match(s) {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(date.and_time(chrono::NaiveTime::MIN));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn classify_text(s: &str) -> SortClass {
    if is_numeric_text(s) {
        if let Ok(n) = s.parse::<f64>() {
            return SortClass::Number(n);
        }
    }
    if let Some(dt) = parse_iso_datetime(s) {
        return SortClass::Date(dt);
    }
    SortClass::Text(s.to_string())
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Compare two classified values
#[must_use]
pub fn compare_classes(a: &SortClass, b: &SortClass) -> Ordering {
    match (a, b) {
        (SortClass::Number(x), SortClass::Number(y)) => x.total_cmp(y),
        (SortClass::Date(x), SortClass::Date(y)) => x.cmp(y),
        (SortClass::Text(x), SortClass::Text(y)) => compare_text(x, y),
        _ => a.rank().cmp(&b.rank()),
    }
}

/// Compare two field values with the type-aware ordering
#[must_use]
pub fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    compare_classes(&SortClass::of(a), &SortClass::of(b))
}
