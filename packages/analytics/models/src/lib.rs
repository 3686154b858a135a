#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for the call-center report views.
//!
//! Every view in `call_center_analytics` returns one of these. They carry
//! plain counts and labels so they can be printed as tables or serialized
//! to JSON without access to the underlying records.

use call_center_incident_models::Flag;
use call_center_source_models::SourceYear;
use serde::{Deserialize, Serialize};

/// A labelled count (one bar of a bar chart, one point of a series).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    /// Group label (category name, `2024-07`, hour, ...).
    pub key: String,
    /// Number of records in the group.
    pub count: usize,
}

/// Count of records with a flag set, and its share of the view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlagSummary {
    /// Which flag.
    pub flag: Flag,
    /// Records with the flag set.
    pub count: usize,
    /// `count` as a percentage of the view total. `0.0` for an empty view.
    pub pct: f64,
}

impl FlagSummary {
    /// Builds a summary, computing the percentage of `total`.
    #[must_use]
    pub fn new(flag: Flag, count: usize, total: usize) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let pct = if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        };
        Self { flag, count, pct }
    }
}

/// Headline numbers for the filtered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewReport {
    /// Records in the filtered view.
    pub total: usize,
    /// One entry per flag, in [`Flag::all`] order.
    pub flags: Vec<FlagSummary>,
    /// Ten most frequent categories.
    pub top_categories: Vec<CountRow>,
    /// Ten most frequent report types.
    pub top_report_types: Vec<CountRow>,
}

/// A count series for a single source export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSeries {
    /// The export.
    pub source: SourceYear,
    /// Points in ascending key order.
    pub points: Vec<CountRow>,
}

/// Volume over time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePatternsReport {
    /// Monthly counts per source over the whole record set.
    pub monthly: Vec<SourceSeries>,
    /// Daily counts per source over the whole record set.
    pub daily: Vec<SourceSeries>,
    /// Hourly counts per source over the whole record set.
    pub hourly: Vec<SourceSeries>,
    /// Counts per weekday over the filtered view, Monday first. All seven
    /// days are listed.
    pub weekday: Vec<CountRow>,
}

/// Per-subdistrict breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubdistrictDetail {
    /// Subdistrict name.
    pub subdistrict: String,
    /// Records in the subdistrict that carry a reporter identity.
    pub total: usize,
    /// Ghost calls.
    pub ghost_calls: usize,
    /// Prank calls.
    pub prank_calls: usize,
    /// Short calls.
    pub short_calls: usize,
    /// Fake locations.
    pub fake_locations: usize,
}

/// Where reports come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationReport {
    /// Fifteen busiest subdistricts in the filtered view.
    pub top_subdistricts: Vec<CountRow>,
    /// Twenty busiest subdistricts over the whole record set. Records
    /// without a subdistrict are not included.
    pub detail: Vec<SubdistrictDetail>,
    /// Ghost calls in the whole record set (these rarely carry a
    /// subdistrict).
    pub ghost_calls_total: usize,
    /// Prank calls in the whole record set.
    pub prank_calls_total: usize,
}

/// Non-genuine call trends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostPrankReport {
    /// Ghost calls per month over the whole record set.
    pub ghost_monthly: Vec<CountRow>,
    /// Prank calls per month over the whole record set.
    pub prank_monthly: Vec<CountRow>,
    /// Fake locations in the filtered view.
    pub fake_location: FlagSummary,
    /// Rapid repeats in the filtered view.
    pub rapid_repeat: FlagSummary,
}

/// Per-agent breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDetail {
    /// Agent name.
    pub agent: String,
    /// Reports handled that carry a reporter identity.
    pub total: usize,
    /// Ghost calls handled.
    pub ghost_calls: usize,
    /// Prank calls handled.
    pub prank_calls: usize,
    /// Short calls handled.
    pub short_calls: usize,
    /// Mean handling duration, rounded to two decimals. `None` when no
    /// report from this agent has a duration.
    pub mean_duration_seconds: Option<f64>,
}

/// Agent workload and quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReport {
    /// Fifteen agents with the most reports.
    pub top_by_volume: Vec<CountRow>,
    /// Ten agents with the most ghost calls.
    pub top_by_ghost: Vec<CountRow>,
    /// Ten agents with the most prank calls.
    pub top_by_prank: Vec<CountRow>,
    /// Twenty agents with the most reports.
    pub detail: Vec<AgentDetail>,
}

/// Statistics about the loaded record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
    /// Total records.
    pub total: usize,
    /// Records per source export, in load order.
    pub per_source: Vec<CountRow>,
    /// Logical columns found in at least one source.
    pub columns_present: Vec<String>,
    /// Logical columns found in neither source.
    pub columns_missing: Vec<String>,
    /// Records whose report time is absent or unparseable.
    pub missing_report_time: usize,
    /// Records whose duration is absent or unparseable.
    pub missing_duration: usize,
    /// Records missing either coordinate.
    pub missing_coordinates: usize,
    /// Records without a reporter identity.
    pub missing_identity: usize,
}
