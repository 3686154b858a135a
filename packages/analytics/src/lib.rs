#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Read-only analytics over a [`CanonicalRecordSet`].
//!
//! [`view::RecordView`] and [`view::DashboardFilter`] select records,
//! [`group`] buckets them by a column, and [`reports`] builds the five
//! dashboard views plus a load summary.
//!
//! [`CanonicalRecordSet`]: call_center_incident_models::CanonicalRecordSet

pub mod group;
pub mod reports;
pub mod view;

pub use group::{Group, group_by, top_n, top_n_by};
pub use view::{ColumnValue, DashboardFilter, GroupColumn, Measure, RecordView};
