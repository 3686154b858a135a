//! The composition root: load → derive → detect.

use std::path::PathBuf;
use std::time::Instant;

use call_center_incident_models::CanonicalRecordSet;
use call_center_source::columns::ColumnMapping;
use call_center_source::derive::derive_records;
use call_center_source::loader::load_sources;
use sha2::{Digest as _, Sha256};

use crate::PipelineError;
use crate::spam::detect_rapid_repeats;

/// Default location of the first export.
pub const DEFAULT_SOURCE_2024: &str = "LAPORAN INSIDEN CALL CENTER 112 TAHUN 2024.xlsx";
/// Default location of the second export.
pub const DEFAULT_SOURCE_2025: &str = "LAPORAN INSIDEN CALLCENTER 112 TAHUN 2025.xlsx";
/// Environment variable overriding [`DEFAULT_SOURCE_2024`].
pub const SOURCE_2024_ENV: &str = "CALL_CENTER_SOURCE_2024";
/// Environment variable overriding [`DEFAULT_SOURCE_2025`].
pub const SOURCE_2025_ENV: &str = "CALL_CENTER_SOURCE_2025";

/// Hex SHA-256 identifying one pipeline input (source pair plus column
/// mapping).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// The hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The two yearly exports a record set is built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourcePair {
    /// First export, tagged `2024`.
    pub first: PathBuf,
    /// Second export, tagged `2025`.
    pub second: PathBuf,
}

impl SourcePair {
    /// Creates a pair from two paths.
    #[must_use]
    pub fn new(first: impl Into<PathBuf>, second: impl Into<PathBuf>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Resolves each path from the explicit value, then its environment
    /// variable, then the default file name.
    #[must_use]
    pub fn resolve(first: Option<PathBuf>, second: Option<PathBuf>) -> Self {
        Self {
            first: resolve_path(first, SOURCE_2024_ENV, DEFAULT_SOURCE_2024),
            second: resolve_path(second, SOURCE_2025_ENV, DEFAULT_SOURCE_2025),
        }
    }

    /// Computes the cache key for this pair read with `columns`.
    #[must_use]
    pub fn cache_key(&self, columns: &ColumnMapping) -> CacheKey {
        let mut hasher = Sha256::new();
        for path in [&self.first, &self.second] {
            hasher.update(path.as_os_str().as_encoded_bytes());
            hasher.update([0]);
        }
        hasher.update(serde_json::to_vec(columns).unwrap_or_default());
        CacheKey(hex::encode(hasher.finalize()))
    }
}

fn resolve_path(explicit: Option<PathBuf>, env_var: &str, default: &str) -> PathBuf {
    explicit
        .or_else(|| {
            std::env::var(env_var)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(default))
}

/// Loads both sources, derives canonical records and flags rapid repeats.
///
/// # Errors
///
/// Returns [`PipelineError::SourceNotFound`] if a path does not exist, or
/// [`PipelineError::SourceUnreadable`] if a source cannot be parsed.
pub fn run_pipeline(
    sources: &SourcePair,
    columns: &ColumnMapping,
) -> Result<CanonicalRecordSet, PipelineError> {
    let start = Instant::now();
    log::info!(
        "Building record set from {} and {}",
        sources.first.display(),
        sources.second.display()
    );

    let raw = load_sources(&sources.first, &sources.second)?;
    let loaded = start.elapsed();

    let schema = columns.presence(&raw);
    let mut records = derive_records(&raw, columns);
    detect_rapid_repeats(&mut records, schema.identity);

    let set = CanonicalRecordSet::new(records, schema);
    log::info!(
        "Record set ready: {} records (load {:.2}s, total {:.2}s)",
        set.len(),
        loaded.as_secs_f64(),
        start.elapsed().as_secs_f64()
    );
    Ok(set)
}
