#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Source year tags and the raw, schema-free row format.
//!
//! Every spreadsheet export is read into [`RawRecord`]s: untyped cell values
//! keyed by trimmed header text. The two yearly exports are concatenated into
//! one [`RawRecordSet`] whose schema is the union of both header rows.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

/// Which yearly export a row came from.
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
pub enum SourceYear {
    /// The first source (2024 export).
    #[serde(rename = "2024")]
    #[strum(serialize = "2024")]
    Y2024,
    /// The second source (2025 export).
    #[serde(rename = "2025")]
    #[strum(serialize = "2025")]
    Y2025,
}

impl SourceYear {
    /// Returns all variants in load order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Y2024, Self::Y2025]
    }
}

/// A single spreadsheet row tagged with its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Which export this row was read from.
    pub source: SourceYear,
    /// Cell values keyed by trimmed header text. Empty cells are
    /// [`Value::Null`].
    pub fields: BTreeMap<String, Value>,
}

impl RawRecord {
    /// Returns the cell for `column`, treating `null` as missing.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column).filter(|v| !v.is_null())
    }

    /// Returns the cell for `column` rendered as text.
    ///
    /// Strings are returned as-is, integral numbers without a fractional
    /// part (`5.0` becomes `"5"`), booleans as `"true"`/`"false"`.
    #[must_use]
    pub fn get_text(&self, column: &str) -> Option<String> {
        self.get(column).and_then(value_to_text)
    }
}

/// Renders a scalar cell as text. Returns `None` for `null`, arrays and
/// objects.
#[must_use]
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i.to_string());
            }
            if let Some(u) = n.as_u64() {
                return Some(u.to_string());
            }
            let f = n.as_f64()?;
            if f.fract() == 0.0 && f.abs() < 9.0e15 {
                #[allow(clippy::cast_possible_truncation)]
                let whole = f as i64;
                return Some(whole.to_string());
            }
            Some(f.to_string())
        }
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// All raw rows from both sources plus the union of their column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecordSet {
    /// Trimmed header names seen in any source.
    pub columns: BTreeSet<String>,
    /// Rows in load order: every row of the first source, then the second.
    pub rows: Vec<RawRecord>,
}

impl RawRecordSet {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any source carried a column with this (trimmed) header.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// Appends one source's rows, trimming header names.
    ///
    /// `rows` are positional and aligned with `headers`. Blank headers are
    /// dropped along with their cells; short rows are padded with `null`.
    pub fn append_source(&mut self, source: SourceYear, headers: &[String], rows: Vec<Vec<Value>>) {
        let trimmed: Vec<Option<String>> = headers
            .iter()
            .map(|h| {
                let h = h.trim();
                (!h.is_empty()).then(|| h.to_string())
            })
            .collect();

        self.columns.extend(trimmed.iter().flatten().cloned());
        self.rows.reserve(rows.len());

        for row in rows {
            let mut cells = row.into_iter();
            let mut fields = BTreeMap::new();
            for header in &trimmed {
                let value = cells.next().unwrap_or(Value::Null);
                if let Some(name) = header {
                    fields.insert(name.clone(), value);
                }
            }
            self.rows.push(RawRecord { source, fields });
        }
    }

    /// Row count per source.
    #[must_use]
    pub fn count_by_source(&self) -> BTreeMap<SourceYear, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.source).or_insert(0) += 1;
        }
        counts
    }
}
