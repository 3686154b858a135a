//! Record selection: views, column accessors and dashboard filters.

use std::fmt;

use call_center_incident_models::{
    CanonicalRecord, CanonicalRecordSet, Flag, SchemaPresence, YearMonth, weekday_name,
};
use call_center_source_models::SourceYear;
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A column records can be filtered, sorted or grouped by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GroupColumn {
    /// Source export.
    Source,
    /// Report year.
    Year,
    /// Report month, 1-12.
    Month,
    /// Report year and month.
    YearMonth,
    /// Report date.
    Date,
    /// Report hour, 0-23.
    Hour,
    /// Report weekday.
    Weekday,
    /// Lowercased report type.
    ReportType,
    /// Incident category.
    Category,
    /// Subdistrict.
    Subdistrict,
    /// Ward.
    Ward,
    /// Handling agent.
    Agent,
    /// Reporter identity.
    Identity,
}

impl GroupColumn {
    /// Reads this column from a record. `None` when the value is absent.
    #[must_use]
    pub fn value(self, record: &CanonicalRecord) -> Option<ColumnValue> {
        let text = |v: &Option<String>| v.clone().map(ColumnValue::Text);
        match self {
            Self::Source => Some(ColumnValue::Source(record.source)),
            Self::Year => record.time.map(|t| ColumnValue::Int(i64::from(t.year))),
            Self::Month => record.time.map(|t| ColumnValue::Int(i64::from(t.month))),
            Self::YearMonth => record.time.map(|t| ColumnValue::YearMonth(t.year_month)),
            Self::Date => record.time.map(|t| ColumnValue::Date(t.date)),
            Self::Hour => record.time.map(|t| ColumnValue::Int(i64::from(t.hour))),
            Self::Weekday => record.time.map(|t| ColumnValue::weekday(t.weekday)),
            Self::ReportType => Some(ColumnValue::Text(record.report_type.clone())),
            Self::Category => text(&record.category),
            Self::Subdistrict => text(&record.subdistrict),
            Self::Ward => text(&record.ward),
            Self::Agent => text(&record.agent),
            Self::Identity => text(&record.identity),
        }
    }
}

/// A single column value. Ordering follows the natural order of the
/// underlying type (chronological for time columns, Monday first for
/// weekdays).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValue {
    /// Source export.
    Source(SourceYear),
    /// Integer fields (year, month, hour).
    Int(i64),
    /// Calendar date.
    Date(NaiveDate),
    /// Year-month bucket.
    YearMonth(YearMonth),
    /// Days since Monday, 0-6.
    Weekday(u8),
    /// Text fields.
    Text(String),
}

impl ColumnValue {
    /// Wraps a chrono weekday.
    #[must_use]
    pub fn weekday(weekday: Weekday) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let index = weekday.num_days_from_monday() as u8;
        Self::Weekday(index)
    }

    /// Wraps a text value.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(s) => write!(f, "{s}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::YearMonth(ym) => write!(f, "{ym}"),
            Self::Weekday(i) => {
                let day = Weekday::try_from(*i).unwrap_or(Weekday::Mon);
                f.write_str(weekday_name(day))
            }
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A numeric quantity that can be summed or averaged per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    /// Handling duration in seconds. Absent durations are skipped.
    DurationSeconds,
    /// A flag, counted as 1 when set and 0 otherwise.
    Flag(Flag),
}

impl Measure {
    /// Reads this measure from a record.
    #[must_use]
    pub fn value(self, record: &CanonicalRecord) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::DurationSeconds => record.duration_seconds.map(|d| d as f64),
            Self::Flag(flag) => Some(if record.flags.get(flag) { 1.0 } else { 0.0 }),
        }
    }
}

/// A borrowed, ordered selection of records from one record set.
#[derive(Debug, Clone)]
pub struct RecordView<'a> {
    records: Vec<&'a CanonicalRecord>,
    schema: &'a SchemaPresence,
}

impl<'a> RecordView<'a> {
    /// A view over every record, in load order.
    #[must_use]
    pub fn new(set: &'a CanonicalRecordSet) -> Self {
        Self {
            records: set.iter().collect(),
            schema: set.schema(),
        }
    }

    /// Schema of the underlying record set.
    #[must_use]
    pub const fn schema(&self) -> &'a SchemaPresence {
        self.schema
    }

    /// Records in view order.
    #[must_use]
    pub fn records(&self) -> &[&'a CanonicalRecord] {
        &self.records
    }

    /// Number of records in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the view selects nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records with `flag` set.
    #[must_use]
    pub fn count_flag(&self, flag: Flag) -> usize {
        self.records.iter().filter(|r| r.flags.get(flag)).count()
    }

    /// Keeps the records matching `pred`.
    #[must_use]
    pub fn filter(&self, mut pred: impl FnMut(&CanonicalRecord) -> bool) -> Self {
        Self {
            records: self.records.iter().copied().filter(|r| pred(*r)).collect(),
            schema: self.schema,
        }
    }

    /// Keeps the records whose `column` value is one of `values`. Records
    /// with an absent value never match.
    #[must_use]
    pub fn filter_in(&self, column: GroupColumn, values: &[ColumnValue]) -> Self {
        self.filter(|r| column.value(r).is_some_and(|v| values.contains(&v)))
    }

    /// Stable sort by `column`, absent values last.
    #[must_use]
    pub fn sorted_by(&self, column: GroupColumn) -> Self {
        let mut records = self.records.clone();
        records.sort_by_cached_key(|r| {
            let value = column.value(r);
            (value.is_none(), value)
        });
        Self {
            records,
            schema: self.schema,
        }
    }
}

/// The sidebar filters of the dashboard.
///
/// Empty selections mean "everything". `include_uncategorized` and
/// `include_unlocated` additionally select records whose category or
/// subdistrict is absent, which is where ghost and prank calls land.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardFilter {
    /// Source exports to keep.
    pub sources: Vec<SourceYear>,
    /// Categories to keep.
    pub categories: Vec<String>,
    /// Also keep records without a category.
    pub include_uncategorized: bool,
    /// Subdistricts to keep.
    pub subdistricts: Vec<String>,
    /// Also keep records without a subdistrict.
    pub include_unlocated: bool,
}

impl DashboardFilter {
    /// Whether no filter is active.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.sources.is_empty()
            && self.categories.is_empty()
            && !self.include_uncategorized
            && self.subdistricts.is_empty()
            && !self.include_unlocated
    }

    /// Applies the filter to `view`.
    #[must_use]
    pub fn apply<'a>(&self, view: &RecordView<'a>) -> RecordView<'a> {
        if self.is_unfiltered() {
            return view.clone();
        }
        let filtered = view.filter(|r| self.matches(r));
        log::debug!(
            "Filter kept {} of {} records ({self:?})",
            filtered.len(),
            view.len()
        );
        filtered
    }

    /// Whether a single record passes the filter.
    #[must_use]
    pub fn matches(&self, record: &CanonicalRecord) -> bool {
        (self.sources.is_empty() || self.sources.contains(&record.source))
            && label_matches(
                record.category.as_deref(),
                &self.categories,
                self.include_uncategorized,
            )
            && label_matches(
                record.subdistrict.as_deref(),
                &self.subdistricts,
                self.include_unlocated,
            )
    }
}

fn label_matches(value: Option<&str>, selected: &[String], include_absent: bool) -> bool {
    if selected.is_empty() && !include_absent {
        return true;
    }
    value.map_or(include_absent, |v| selected.iter().any(|s| s == v))
}
