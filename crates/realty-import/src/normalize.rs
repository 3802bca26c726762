//! Shared field normalization rules.
//!
//! Every category mapper funnels raw CSV cells through these functions.
//! Numeric helpers never fail: a missing or garbled cell becomes `0`.
//! Dates are the exception: a present but unreadable date fails the record.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::NormalizeError;

/// Formats tried, in order, for date-only cells.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parses a currency string such as `$450,000`, `$1.5M` or `$2.3B`.
///
/// `$` and `,` are stripped. A trailing `B` multiplies by 1e9, a trailing `M`
/// by 1e6. Anything unreadable yields `0.0`.
pub fn parse_currency(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    let cleaned = cleaned.trim();

    let scaled = |body: &str, factor: f64| {
        let value = leading_number(body.trim()).unwrap_or(0.0) * factor;
        (value * 100.0).round() / 100.0
    };

    if let Some(body) = cleaned.strip_suffix(['B', 'b']) {
        scaled(body, 1_000_000_000.0)
    } else if let Some(body) = cleaned.strip_suffix(['M', 'm']) {
        scaled(body, 1_000_000.0)
    } else {
        leading_number(cleaned).unwrap_or(0.0)
    }
}

/// Parses a percentage on the 0-100 scale: `"8%"` is `8.0`, not `0.08`.
pub fn parse_percentage(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let body = trimmed.strip_suffix('%').unwrap_or(trimmed);
    parse_number(body)
}

/// Parses a plain number, tolerating thousands separators, a dollar sign and
/// trailing units (`"5.2%"` reads as `5.2`).
pub fn parse_number(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    leading_number(cleaned.trim()).unwrap_or(0.0)
}

/// Parses a count, truncating any fractional part toward zero.
pub fn parse_count(raw: &str) -> i64 {
    parse_number(raw).trunc() as i64
}

/// Returns `raw` trimmed, or `default` when it is empty.
pub fn text_or(raw: Option<&str>, default: &str) -> String {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default.to_string(),
    }
}

/// Returns January 1st of `year`.
pub fn year_start(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Parses a date cell, trying the formats the source reports are known to use.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    // "2024-07" and bare "2024"
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d") {
        return Some(date);
    }
    if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit()) {
        return raw.parse().ok().and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
    }

    None
}

/// Absent cell yields `default`; a present but unreadable cell is an error.
pub fn parse_date_or_default(
    field: &str,
    raw: Option<&str>,
    default: NaiveDate,
) -> Result<NaiveDate, NormalizeError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => parse_date(value).ok_or_else(|| NormalizeError::InvalidDate {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Like [`parse_date_or_default`] but an absent cell yields `None`.
pub fn parse_optional_date(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, NormalizeError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value)
            .map(Some)
            .ok_or_else(|| NormalizeError::InvalidDate {
                field: field.to_string(),
                value: value.to_string(),
            }),
    }
}

/// Parses an embedded JSON cell. Absent yields `None`.
pub fn parse_json_or_null(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<serde_json::Value>, NormalizeError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => serde_json::from_str(value)
            .map(Some)
            .map_err(|e| NormalizeError::InvalidJson {
                field: field.to_string(),
                reason: e.to_string(),
            }),
    }
}

/// Reads the longest numeric prefix of `s` (sign, digits, fraction, exponent).
fn leading_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
