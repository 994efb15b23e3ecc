//! Field normalizers shared by every parser: timestamp canonicalization and
//! severity clamping. Neither function can fail; unusable input falls back to
//! the raw timestamp or severity 0.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike};
use serde_json::Value;

/// Highest severity an event can carry.
pub const MAX_SEVERITY: u8 = 10;

/// Year assumed for syslog timestamps, which carry none.
const SYSLOG_DEFAULT_YEAR: &str = "1900";

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Convert a raw timestamp to ISO-8601, or hand back the input untouched.
///
/// Tries ISO-8601 first (a trailing `Z` is read as `+00:00`), then the
/// yearless syslog form `Sep 02 17:23:54`, which lands in 1900.
pub fn normalize_timestamp(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    parse_iso(raw)
        .or_else(|| parse_syslog(raw))
        .unwrap_or_else(|| raw.to_string())
}

fn parse_iso(raw: &str) -> Option<String> {
    let candidate = match raw.strip_suffix('Z') {
        Some(stripped) => format!("{stripped}+00:00"),
        None => raw.to_string(),
    };

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&candidate, fmt) {
            return Some(format_iso(&dt.naive_local(), Some(dt.offset())));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(&candidate, fmt) {
            return Some(format_iso(&ndt, None));
        }
    }

    NaiveDate::parse_from_str(&candidate, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|ndt| format_iso(&ndt, None))
}

fn parse_syslog(raw: &str) -> Option<String> {
    // "Sep  2 17:23:54" pads the day with a space
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let with_year = format!("{SYSLOG_DEFAULT_YEAR} {collapsed}");

    NaiveDateTime::parse_from_str(&with_year, "%Y %b %d %H:%M:%S")
        .ok()
        .map(|ndt| format_iso(&ndt, None))
}

fn format_iso(ndt: &NaiveDateTime, offset: Option<&FixedOffset>) -> String {
    let mut out = ndt.format("%Y-%m-%dT%H:%M:%S").to_string();

    let micros = ndt.nanosecond() / 1_000;
    if micros != 0 {
        out.push_str(&format!(".{micros:06}"));
    }

    if let Some(offset) = offset {
        let secs = offset.local_minus_utc();
        let sign = if secs < 0 { '-' } else { '+' };
        let secs = secs.abs();
        out.push_str(&format!("{sign}{:02}:{:02}", secs / 3600, (secs % 3600) / 60));
    }

    out
}

/// Clamp a textual severity into `0..=10`; anything non-integral becomes 0.
pub fn normalize_severity(raw: &str) -> u8 {
    let trimmed = raw.trim();

    match trimmed.parse::<i64>() {
        Ok(value) => clamp_severity(value),
        Err(_) => overflowing_digits(trimmed).unwrap_or(0),
    }
}

/// Severity from a structured value (a JSON `rule.level`, say).
pub fn normalize_severity_value(value: &Value) -> u8 {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                clamp_severity(i)
            } else if n.as_u64().is_some() {
                MAX_SEVERITY
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| clamp_severity(f.trunc() as i64))
                    .unwrap_or(0)
            }
        }
        Value::String(s) => normalize_severity(s),
        Value::Bool(b) => u8::from(*b),
        Value::Null | Value::Array(_) | Value::Object(_) => 0,
    }
}

fn clamp_severity(value: i64) -> u8 {
    value.clamp(0, MAX_SEVERITY as i64) as u8
}

// Integers too wide for i64 still clamp by sign.
fn overflowing_digits(s: &str) -> Option<u8> {
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(if negative { 0 } else { MAX_SEVERITY })
}
