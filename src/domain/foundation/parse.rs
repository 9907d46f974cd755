//! Lenient parsers for upstream feed fields.
//!
//! The book-of-record feed carries string-typed booleans ("true"/"false"),
//! amounts with grouping separators ("1,23,000"), free-text ratings and
//! loosely formatted dates. These parsers define the crate-wide fallback
//! behavior for such fields: unparseable flags read as `false`, unparseable
//! amounts as zero, unparseable dates and ratings as an explicit skip. A bad
//! field never fails a record, and a bad record never fails a scan.
//!
//! Month arithmetic uses integer division of elapsed days by 30. This is a
//! coarse, calendar-inaccurate approximation kept deliberately: every
//! detector threshold was tuned against it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Outcome of parsing an optional free-text field.
///
/// `Skipped` is a defined result, not an error: a detector filter consumes
/// it and drops the record from that rule's candidate set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParseOutcome<T> {
    Parsed(T),
    Skipped,
}

impl<T> ParseOutcome<T> {
    /// Returns the parsed value, or None when the field was skipped.
    pub fn parsed(self) -> Option<T> {
        match self {
            ParseOutcome::Parsed(value) => Some(value),
            ParseOutcome::Skipped => None,
        }
    }

    /// Returns true when the field parsed successfully.
    pub fn is_parsed(&self) -> bool {
        matches!(self, ParseOutcome::Parsed(_))
    }
}

/// Parses a string-typed boolean flag.
///
/// "true", "1" and "yes" (any case, surrounding whitespace ignored) read as
/// true; everything else, including empty and absent values, reads as false.
pub fn parse_flag(raw: Option<&str>) -> bool {
    match raw {
        Some(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes"
        ),
        None => false,
    }
}

/// Parses a monetary amount that may carry grouping separators or a
/// currency marker. Unparseable or absent values read as zero.
pub fn parse_amount(raw: Option<&str>) -> f64 {
    let Some(text) = raw else { return 0.0 };
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Parses a free-text fund rating into a number.
///
/// Non-numeric ratings ("Unrated", "N/A") are a defined skip, not an error.
pub fn parse_rating(raw: Option<&str>) -> ParseOutcome<f64> {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => match text.parse::<f64>() {
            Ok(value) => ParseOutcome::Parsed(value),
            Err(_) => ParseOutcome::Skipped,
        },
        _ => ParseOutcome::Skipped,
    }
}

/// Date formats observed in the feed, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a loosely formatted date string. Unparseable or empty values
/// read as None.
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive())
}

/// Whole days elapsed between a date and the reference instant.
pub fn days_since(date: NaiveDate, as_of: DateTime<Utc>) -> i64 {
    (as_of.date_naive() - date).num_days()
}

/// Whole "months" elapsed, defined as `days / 30` integer division.
pub fn months_since(date: NaiveDate, as_of: DateTime<Utc>) -> i64 {
    days_since(date, as_of).div_euclid(30)
}

// ----- Serde deserializers for feed records -----

/// Raw value that may arrive as a native boolean or a string flag.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Text(String),
}

/// Deserializes a string-typed boolean field.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawFlag> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawFlag::Bool(value)) => value,
        Some(RawFlag::Text(text)) => parse_flag(Some(&text)),
        None => false,
    })
}

/// Raw value that may arrive as a native number or a formatted string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

/// Deserializes a monetary amount field.
pub(crate) fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawAmount> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawAmount::Number(value)) => value,
        Some(RawAmount::Text(text)) => parse_amount(Some(&text)),
        None => 0.0,
    })
}

/// Deserializes an optional loosely formatted date field.
pub(crate) fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(parse_date(raw.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn flag_accepts_truthy_spellings() {
        assert!(parse_flag(Some("true")));
        assert!(parse_flag(Some("TRUE")));
        assert!(parse_flag(Some(" 1 ")));
        assert!(parse_flag(Some("yes")));
    }

    #[test]
    fn flag_reads_everything_else_as_false() {
        assert!(!parse_flag(Some("false")));
        assert!(!parse_flag(Some("")));
        assert!(!parse_flag(Some("n/a")));
        assert!(!parse_flag(None));
    }

    #[test]
    fn amount_strips_grouping_separators() {
        assert_eq!(parse_amount(Some("1,23,000")), 123000.0);
        assert_eq!(parse_amount(Some("5,000.50")), 5000.50);
    }

    #[test]
    fn amount_reads_garbage_as_zero() {
        assert_eq!(parse_amount(Some("unknown")), 0.0);
        assert_eq!(parse_amount(Some("")), 0.0);
        assert_eq!(parse_amount(None), 0.0);
    }

    #[test]
    fn rating_parses_numeric_text() {
        assert_eq!(parse_rating(Some("2.5")), ParseOutcome::Parsed(2.5));
        assert_eq!(parse_rating(Some(" 4 ")), ParseOutcome::Parsed(4.0));
    }

    #[test]
    fn rating_skips_non_numeric_text() {
        assert_eq!(parse_rating(Some("Unrated")), ParseOutcome::Skipped);
        assert_eq!(parse_rating(Some("")), ParseOutcome::Skipped);
        assert_eq!(parse_rating(None), ParseOutcome::Skipped);
        assert_eq!(parse_rating(Some("Unrated")).parsed(), None);
    }

    #[test]
    fn date_accepts_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 5, 10).unwrap();
        assert_eq!(parse_date(Some("2023-05-10")), Some(expected));
        assert_eq!(parse_date(Some("10/05/2023")), Some(expected));
        assert_eq!(parse_date(Some("2023-05-10T08:30:00")), Some(expected));
        assert_eq!(parse_date(Some("2023-05-10T08:30:00+05:30")), Some(expected));
    }

    #[test]
    fn date_reads_garbage_as_none() {
        assert_eq!(parse_date(Some("not a date")), None);
        assert_eq!(parse_date(Some("")), None);
        assert_eq!(parse_date(None), None);
    }

    #[test]
    fn months_since_uses_thirty_day_division() {
        // 2023-04-16 -> 2024-06-15 is 426 days; 426 / 30 = 14.
        let start = NaiveDate::from_ymd_opt(2023, 4, 16).unwrap();
        assert_eq!(days_since(start, as_of()), 426);
        assert_eq!(months_since(start, as_of()), 14);
    }

    #[test]
    fn months_since_truncates_partial_months() {
        // 59 days is still one "month" under the 30-day rule.
        let start = NaiveDate::from_ymd_opt(2024, 4, 17).unwrap();
        assert_eq!(days_since(start, as_of()), 59);
        assert_eq!(months_since(start, as_of()), 1);
    }

    #[test]
    fn flag_deserializer_accepts_bool_and_string() {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(deserialize_with = "super::flag", default)]
            active: bool,
        }

        let from_text: Probe = serde_json::from_str(r#"{"active":"true"}"#).unwrap();
        assert!(from_text.active);
        let from_bool: Probe = serde_json::from_str(r#"{"active":false}"#).unwrap();
        assert!(!from_bool.active);
        let from_null: Probe = serde_json::from_str(r#"{"active":null}"#).unwrap();
        assert!(!from_null.active);
    }

    #[test]
    fn amount_deserializer_accepts_number_and_string() {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(deserialize_with = "super::amount", default)]
            value: f64,
        }

        let from_number: Probe = serde_json::from_str(r#"{"value":1500.0}"#).unwrap();
        assert_eq!(from_number.value, 1500.0);
        let from_text: Probe = serde_json::from_str(r#"{"value":"2,50,000"}"#).unwrap();
        assert_eq!(from_text.value, 250000.0);
    }
}
