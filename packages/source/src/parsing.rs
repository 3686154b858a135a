//! Shared parsing utilities for call-center spreadsheet cells.
//!
//! Duration text, report timestamps, coordinates and free-text labels all
//! come from operator-entered spreadsheets. Every parser here degrades to
//! `None` instead of failing.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use regex::Regex;
use serde_json::Value;

/// Matches every run of ASCII digits.
static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// `(days, hours, minutes, seconds)` keyword patterns, each capturing the
/// integer right before the unit label.
static UNIT_RES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)([0-9]+)\s*hari").expect("valid regex"),
        Regex::new(r"(?i)([0-9]+)\s*jam").expect("valid regex"),
        Regex::new(r"(?i)([0-9]+)\s*menit").expect("valid regex"),
        Regex::new(r"(?i)([0-9]+)\s*detik").expect("valid regex"),
    ]
});

/// Parses an elapsed-time string such as
/// `"0 Hari : 20 Jam : 41 Menit : 56 Detik"` into seconds.
///
/// Falls back to positional `d h m s` when the unit labels are missing but
/// at least four integers are present, then to the last integer as a plain
/// seconds value. Returns `None` for blank input, input without digits, or
/// values that overflow `u64`.
#[must_use]
pub fn parse_duration_seconds(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut units = [0_u64; 4];
    let mut any_unit = false;
    for (slot, re) in units.iter_mut().zip(UNIT_RES.iter()) {
        if let Some(caps) = re.captures(text) {
            *slot = caps[1].parse().ok()?;
            any_unit = true;
        }
    }
    if any_unit {
        return total_seconds(units);
    }

    let integers: Vec<&str> = INTEGER_RE.find_iter(text).map(|m| m.as_str()).collect();
    if integers.len() >= 4 {
        let mut positional = [0_u64; 4];
        for (slot, digits) in positional.iter_mut().zip(&integers) {
            *slot = digits.parse().ok()?;
        }
        return total_seconds(positional);
    }

    integers.last()?.parse().ok()
}

/// Parses a duration cell of any scalar type.
#[must_use]
pub fn parse_duration_value(value: &Value) -> Option<u64> {
    call_center_source_models::value_to_text(value).and_then(|s| parse_duration_seconds(&s))
}

fn total_seconds([days, hours, minutes, seconds]: [u64; 4]) -> Option<u64> {
    days.checked_mul(86_400)?
        .checked_add(hours.checked_mul(3_600)?)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Timestamp layouts seen in the exports, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

/// Date-only layouts, interpreted as midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Parses report-time text into a naive local timestamp.
#[must_use]
pub fn parse_report_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    // Offset timestamps keep their wall-clock time.
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parses a report-time cell. Numbers are treated as spreadsheet serial
/// dates (fractional days since 1899-12-30).
#[must_use]
pub fn parse_report_time_value(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_report_time(s),
        Value::Number(n) => n.as_f64().and_then(excel_serial_to_datetime),
        _ => None,
    }
}

/// Converts a spreadsheet serial date to a timestamp, rounded to the
/// nearest second.
#[must_use]
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(1.0..2_958_466.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    #[allow(clippy::cast_possible_truncation)]
    let seconds = (serial * 86_400.0).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

/// Coerces a coordinate cell to a number. Non-numeric text becomes `None`.
#[must_use]
pub fn parse_coordinate(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Placeholder texts that mean "no value" in the exports.
const ABSENT_MARKERS: &[&str] = &["-", "", "nan"];

/// Trims a label and maps the export's placeholder values to `None`.
#[must_use]
pub fn clean_label(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!ABSENT_MARKERS.contains(&trimmed)).then_some(trimmed)
}

/// Trims and title-cases a place or category label.
#[must_use]
pub fn normalize_label(text: &str) -> Option<String> {
    clean_label(text).map(title_case)
}

/// Uppercases the first letter of every alphabetic run and lowercases the
/// rest, so `"KEBON JERUK"` becomes `"Kebon Jeruk"`.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_duration_label() {
        assert_eq!(
            parse_duration_seconds("2 Hari : 3 Jam : 15 Menit : 10 Detik"),
            Some(2 * 86_400 + 3 * 3_600 + 15 * 60 + 10)
        );
        assert_eq!(parse_duration_seconds("0 Hari : 0 Jam : 0 Menit : 5 Detik"), Some(5));
    }

    #[test]
    fn unit_labels_are_case_insensitive_and_partial() {
        assert_eq!(parse_duration_seconds("1 MENIT 30 detik"), Some(90));
        assert_eq!(parse_duration_seconds("2jam"), Some(7_200));
    }

    #[test]
    fn blank_duration_is_absent() {
        assert_eq!(parse_duration_seconds(""), None);
        assert_eq!(parse_duration_seconds("   "), None);
        assert_eq!(parse_duration_seconds("no digits here"), None);
    }

    #[test]
    fn falls_back_to_positional_integers() {
        assert_eq!(
            parse_duration_seconds("garbage 7 8 9 10"),
            Some(7 * 86_400 + 8 * 3_600 + 9 * 60 + 10)
        );
    }

    #[test]
    fn falls_back_to_last_integer() {
        assert_eq!(parse_duration_seconds("42"), Some(42));
        assert_eq!(parse_duration_seconds("about 3 or 12"), Some(12));
    }

    #[test]
    fn overflowing_duration_is_absent() {
        assert_eq!(parse_duration_seconds("99999999999999999999999 Hari"), None);
        assert_eq!(parse_duration_seconds("999999999999999 Hari"), None);
    }

    #[test]
    fn parses_numeric_duration_cell() {
        assert_eq!(parse_duration_value(&json!(5.0)), Some(5));
        assert_eq!(parse_duration_value(&Value::Null), None);
    }

    #[test]
    fn parses_report_time_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(parse_report_time("2024-03-05 14:30:00"), Some(expected));
        assert_eq!(parse_report_time("2024-03-05T14:30:00.000"), Some(expected));
        assert_eq!(parse_report_time("05/03/2024 14:30"), Some(expected));
        assert_eq!(
            parse_report_time("2024-03-05"),
            expected.date().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_report_time("not a time"), None);
    }

    #[test]
    fn offset_timestamps_keep_wall_clock_time() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(parse_report_time("2024-03-05T14:30:00Z"), Some(expected));
        assert_eq!(parse_report_time("2024-03-05T14:30:00+07:00"), Some(expected));
    }

    #[test]
    fn parses_excel_serial_dates() {
        // 45357.5 is 2024-03-06 12:00.
        let dt = parse_report_time_value(&json!(45_357.5)).unwrap();
        assert_eq!(dt.to_string(), "2024-03-06 12:00:00");
        assert!(parse_report_time_value(&json!(-3)).is_none());
    }

    #[test]
    fn coerces_coordinates() {
        assert_eq!(parse_coordinate(&json!(-6.2)), Some(-6.2));
        assert_eq!(parse_coordinate(&json!(" 106.8 ")), Some(106.8));
        assert_eq!(parse_coordinate(&json!("n/a")), None);
        assert_eq!(parse_coordinate(&Value::Null), None);
    }

    #[test]
    fn maps_placeholder_labels_to_absent() {
        assert_eq!(normalize_label("-"), None);
        assert_eq!(normalize_label(""), None);
        assert_eq!(normalize_label("nan"), None);
        assert_eq!(normalize_label("  menteng  ").unwrap(), "Menteng");
    }

    #[test]
    fn title_cases_each_word() {
        assert_eq!(title_case("KEBON JERUK"), "Kebon Jeruk");
        assert_eq!(title_case("tanah abang-2"), "Tanah Abang-2");
    }
}
