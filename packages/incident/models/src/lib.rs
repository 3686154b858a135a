#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical call-center incident records and quality flags.
//!
//! Raw spreadsheet rows from both yearly exports are normalized into
//! [`CanonicalRecord`]s. Once built, a [`CanonicalRecordSet`] is never
//! mutated: reporting code only reads from it.

use std::fmt;

use call_center_source_models::SourceYear;
use chrono::{Datelike as _, NaiveDate, NaiveDateTime, Timelike as _, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A calendar month bucket (e.g. `2024-07`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct YearMonth {
    /// Calendar year.
    pub year: i32,
    /// Month, 1-12.
    pub month: u32,
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Calendar fields derived from a report timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeParts {
    /// Calendar date.
    pub date: NaiveDate,
    /// Calendar year.
    pub year: i32,
    /// Month, 1-12.
    pub month: u32,
    /// Day of month, 1-31.
    pub day: u32,
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Day of week.
    pub weekday: Weekday,
    /// Year-month bucket.
    pub year_month: YearMonth,
}

impl TimeParts {
    /// Splits a timestamp into its calendar fields.
    #[must_use]
    pub fn from_timestamp(ts: NaiveDateTime) -> Self {
        let date = ts.date();
        Self {
            date,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            hour: ts.hour(),
            weekday: date.weekday(),
            year_month: YearMonth {
                year: date.year(),
                month: date.month(),
            },
        }
    }

    /// Full English weekday name (e.g. `"Monday"`).
    #[must_use]
    pub const fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}

/// Full English name of a weekday.
#[must_use]
pub const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// The five quality flags. Each is always a concrete boolean.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Flag {
    /// No genuine reporter content (operator label or heuristic).
    GhostCall,
    /// Labelled as a prank by the operator.
    PrankCall,
    /// Handling duration of at most five seconds.
    ShortCall,
    /// Coordinates are zero/zero.
    FakeLocation,
    /// Same identity reported again within two minutes.
    RapidRepeat,
}

impl Flag {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::GhostCall,
            Self::PrankCall,
            Self::ShortCall,
            Self::FakeLocation,
            Self::RapidRepeat,
        ]
    }
}

/// Quality flags for one record.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFlags {
    /// See [`Flag::GhostCall`].
    pub ghost_call: bool,
    /// See [`Flag::PrankCall`].
    pub prank_call: bool,
    /// See [`Flag::ShortCall`].
    pub short_call: bool,
    /// See [`Flag::FakeLocation`].
    pub fake_location: bool,
    /// See [`Flag::RapidRepeat`].
    pub rapid_repeat: bool,
}

impl CallFlags {
    /// Reads a single flag.
    #[must_use]
    pub const fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::GhostCall => self.ghost_call,
            Flag::PrankCall => self.prank_call,
            Flag::ShortCall => self.short_call,
            Flag::FakeLocation => self.fake_location,
            Flag::RapidRepeat => self.rapid_repeat,
        }
    }

    /// Writes a single flag.
    pub const fn set(&mut self, flag: Flag, value: bool) {
        match flag {
            Flag::GhostCall => self.ghost_call = value,
            Flag::PrankCall => self.prank_call = value,
            Flag::ShortCall => self.short_call = value,
            Flag::FakeLocation => self.fake_location = value,
            Flag::RapidRepeat => self.rapid_repeat = value,
        }
    }
}

/// A call-center report normalized to the canonical schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    /// Export the row was loaded from.
    pub source: SourceYear,
    /// When the report was received. `None` when missing or unparseable.
    pub report_time: Option<NaiveDateTime>,
    /// Calendar fields of `report_time`, present exactly when it is.
    pub time: Option<TimeParts>,
    /// Handling duration in seconds.
    pub duration_seconds: Option<u64>,
    /// Lowercased report type. `"unknown"` when the source lacks one.
    pub report_type: String,
    /// Title-cased incident category.
    pub category: Option<String>,
    /// Title-cased subdistrict (kecamatan).
    pub subdistrict: Option<String>,
    /// Title-cased ward (kelurahan).
    pub ward: Option<String>,
    /// Reported latitude. Never stored as 0 when the cell was blank.
    pub latitude: Option<f64>,
    /// Reported longitude. Never stored as 0 when the cell was blank.
    pub longitude: Option<f64>,
    /// Identifier of the reporting party, used for spam grouping.
    pub identity: Option<String>,
    /// Free-text incident description.
    pub description: Option<String>,
    /// First-level agent that handled the report.
    pub agent: Option<String>,
    /// Derived quality flags.
    pub flags: CallFlags,
}

/// Which logical columns were present in the loaded sources.
///
/// A column counts as present if any source carried its header, even when
/// every cell in it is blank.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaPresence {
    /// Report timestamp column.
    pub report_time: bool,
    /// Duration text column.
    pub duration: bool,
    /// Report type column.
    pub report_type: bool,
    /// Category column.
    pub category: bool,
    /// Subdistrict column.
    pub subdistrict: bool,
    /// Ward column.
    pub ward: bool,
    /// Latitude column.
    pub latitude: bool,
    /// Longitude column.
    pub longitude: bool,
    /// Reporter identity column.
    pub identity: bool,
    /// Description column.
    pub description: bool,
    /// Agent column.
    pub agent: bool,
}

impl SchemaPresence {
    /// Each logical column name paired with whether it was present.
    #[must_use]
    pub const fn columns(&self) -> [(&'static str, bool); 11] {
        [
            ("report_time", self.report_time),
            ("duration", self.duration),
            ("report_type", self.report_type),
            ("category", self.category),
            ("subdistrict", self.subdistrict),
            ("ward", self.ward),
            ("latitude", self.latitude),
            ("longitude", self.longitude),
            ("identity", self.identity),
            ("description", self.description),
            ("agent", self.agent),
        ]
    }
}

/// The immutable, fully derived record set consumed by every report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecordSet {
    records: Vec<CanonicalRecord>,
    schema: SchemaPresence,
}

impl CanonicalRecordSet {
    /// Freezes a list of derived records.
    #[must_use]
    pub const fn new(records: Vec<CanonicalRecord>, schema: SchemaPresence) -> Self {
        Self { records, schema }
    }

    /// All records in load order.
    #[must_use]
    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    /// Which logical columns the sources carried.
    #[must_use]
    pub const fn schema(&self) -> &SchemaPresence {
        &self.schema
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over records in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalRecord> {
        self.records.iter()
    }

    /// Number of records with `flag` set.
    #[must_use]
    pub fn count_flag(&self, flag: Flag) -> usize {
        self.records.iter().filter(|r| r.flags.get(flag)).count()
    }
}

impl<'a> IntoIterator for &'a CanonicalRecordSet {
    type Item = &'a CanonicalRecord;
    type IntoIter = std::slice::Iter<'a, CanonicalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
