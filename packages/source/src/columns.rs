//! Column mapping from logical fields to spreadsheet header text.
//!
//! The exports use localized headers, so header text is configuration. The
//! default mapping is embedded from `columns/default.toml` at compile time;
//! a custom TOML file may override any subset of the fields.

use std::path::Path;

use call_center_incident_models::SchemaPresence;
use call_center_source_models::RawRecordSet;
use serde::{Deserialize, Serialize};

use crate::SourceError;

/// Default header mapping baked into the binary.
const DEFAULT_COLUMNS_TOML: &str = include_str!("../columns/default.toml");

/// Maps logical incident fields to (trimmed) header names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Report timestamp.
    pub report_time: String,
    /// Free-text handling duration.
    pub duration: String,
    /// Report type (e.g. `ghost`, `prank`, `darurat`).
    pub report_type: String,
    /// Incident category.
    pub category: String,
    /// Subdistrict (kecamatan).
    pub subdistrict: String,
    /// Ward (kelurahan).
    pub ward: String,
    /// Latitude.
    pub latitude: String,
    /// Longitude.
    pub longitude: String,
    /// Reporter identity.
    pub identity: String,
    /// Incident description.
    pub description: String,
    /// First-level agent.
    pub agent: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            report_time: "WAKTU LAPOR".to_string(),
            duration: "DURASI PENGERJAAN".to_string(),
            report_type: "TIPE LAPORAN".to_string(),
            category: "KATEGORI".to_string(),
            subdistrict: "KECAMATAN".to_string(),
            ward: "KELURAHAN".to_string(),
            latitude: "LATITUDE".to_string(),
            longitude: "LONGITUDE".to_string(),
            identity: "UID".to_string(),
            description: "DESKRIPSI".to_string(),
            agent: "AGENT L1".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Returns the embedded default mapping.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the embedded TOML is malformed.
    pub fn embedded() -> Result<Self, SourceError> {
        parse_columns_toml(DEFAULT_COLUMNS_TOML)
    }

    /// Reads a mapping from a TOML file. Fields missing from the file keep
    /// their default header.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let text = std::fs::read_to_string(path).map_err(|e| SourceError::Config {
            message: format!("cannot read column mapping {}: {e}", path.display()),
        })?;
        parse_columns_toml(&text)
    }

    /// Determines which mapped columns exist in the loaded schema.
    #[must_use]
    pub fn presence(&self, raw: &RawRecordSet) -> SchemaPresence {
        let has = |header: &str| raw.has_column(header.trim());
        SchemaPresence {
            report_time: has(&self.report_time),
            duration: has(&self.duration),
            report_type: has(&self.report_type),
            category: has(&self.category),
            subdistrict: has(&self.subdistrict),
            ward: has(&self.ward),
            latitude: has(&self.latitude),
            longitude: has(&self.longitude),
            identity: has(&self.identity),
            description: has(&self.description),
            agent: has(&self.agent),
        }
    }
}

/// Parses a [`ColumnMapping`] from a TOML string.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed.
pub fn parse_columns_toml(toml_str: &str) -> Result<ColumnMapping, SourceError> {
    toml::de::from_str(toml_str).map_err(|e| SourceError::Config {
        message: format!("invalid column mapping: {e}"),
    })
}
