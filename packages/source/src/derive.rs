//! Raw row → canonical record derivation.
//!
//! Missing columns never fail derivation: each field falls back to `None`
//! (or `"unknown"` for the report type) and every flag resolves to a plain
//! `bool`.

use call_center_incident_models::{CanonicalRecord, SchemaPresence, TimeParts};
use call_center_source_models::{RawRecord, RawRecordSet};

use crate::columns::ColumnMapping;
use crate::flags::{FlagInputs, evaluate_flags};
use crate::parsing::{
    clean_label, normalize_label, parse_coordinate, parse_duration_value, parse_report_time_value,
};

/// Report type used when the source has no report-type value.
pub const UNKNOWN_REPORT_TYPE: &str = "unknown";

/// Derives canonical records for every raw row, in load order.
///
/// `rapid_repeat` is left `false`; the spam detector fills it in.
#[must_use]
pub fn derive_records(raw: &RawRecordSet, columns: &ColumnMapping) -> Vec<CanonicalRecord> {
    let schema = columns.presence(raw);
    let records: Vec<CanonicalRecord> = raw
        .rows
        .iter()
        .map(|row| derive_record(row, columns, &schema))
        .collect();

    log_absence(&records, &schema);
    records
}

/// Derives one canonical record.
#[must_use]
pub fn derive_record(
    row: &RawRecord,
    columns: &ColumnMapping,
    schema: &SchemaPresence,
) -> CanonicalRecord {
    let cell = |header: &str| row.get(header.trim());
    let text = |header: &str| row.get_text(header.trim());

    let report_time = cell(&columns.report_time).and_then(parse_report_time_value);
    let time = report_time.map(TimeParts::from_timestamp);

    let duration_seconds = cell(&columns.duration).and_then(parse_duration_value);

    let report_type = text(&columns.report_type)
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN_REPORT_TYPE.to_string());

    let category = text(&columns.category).and_then(|t| normalize_label(&t));
    let subdistrict = text(&columns.subdistrict).and_then(|t| normalize_label(&t));
    let ward = text(&columns.ward).and_then(|t| normalize_label(&t));

    let latitude = cell(&columns.latitude).and_then(parse_coordinate);
    let longitude = cell(&columns.longitude).and_then(parse_coordinate);

    let identity = text(&columns.identity)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let description = text(&columns.description).map(|t| t.trim().to_string());
    let agent = text(&columns.agent).and_then(|t| clean_label(&t).map(String::from));

    let flags = evaluate_flags(&FlagInputs {
        schema,
        duration_seconds,
        report_type: &report_type,
        category: category.as_deref(),
        latitude,
        longitude,
        description: description.as_deref(),
    });

    CanonicalRecord {
        source: row.source,
        report_time,
        time,
        duration_seconds,
        report_type,
        category,
        subdistrict,
        ward,
        latitude,
        longitude,
        identity,
        description,
        agent,
        flags,
    }
}

/// Logs aggregate counts of fields that could not be derived.
fn log_absence(records: &[CanonicalRecord], schema: &SchemaPresence) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    let missing_time = records.iter().filter(|r| r.report_time.is_none()).count();
    let missing_duration = records.iter().filter(|r| r.duration_seconds.is_none()).count();
    let missing_coords = records
        .iter()
        .filter(|r| r.latitude.is_none() || r.longitude.is_none())
        .count();
    log::debug!(
        "Derived {} records: {missing_time} without report time, \
         {missing_duration} without duration, {missing_coords} without coordinates \
         (schema: {schema:?})",
        records.len()
    );
}
