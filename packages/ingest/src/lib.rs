#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Builds the canonical call-center record set from the two yearly exports.
//!
//! [`pipeline::run_pipeline`] chains loading, derivation and spam detection;
//! [`cache::PipelineCache`] memoizes its result per pair of sources.

pub mod cache;
pub mod pipeline;
pub mod spam;

pub use cache::PipelineCache;
pub use pipeline::{
    CacheKey, DEFAULT_SOURCE_2024, DEFAULT_SOURCE_2025, SOURCE_2024_ENV, SOURCE_2025_ENV,
    SourcePair, run_pipeline,
};

use std::path::PathBuf;

use call_center_source::SourceError;
use strum_macros::{AsRefStr, Display};

/// Kind of pipeline failure, for callers that only branch on the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum FailureKind {
    /// A source path did not resolve.
    SourceNotFound,
    /// A source resolved but could not be parsed by any reader.
    SourceUnreadable,
}

/// Errors that terminate a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A source path did not resolve.
    #[error("Source file not found: {}", path.display())]
    SourceNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A source could not be parsed.
    #[error("Error loading source data: {message}")]
    SourceUnreadable {
        /// Description of what went wrong.
        message: String,
    },
}

impl PipelineError {
    /// The failure category.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::SourceNotFound { .. } => FailureKind::SourceNotFound,
            Self::SourceUnreadable { .. } => FailureKind::SourceUnreadable,
        }
    }
}

impl From<SourceError> for PipelineError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::NotFound { path } => Self::SourceNotFound { path },
            other @ (SourceError::Unreadable { .. }
            | SourceError::Reader { .. }
            | SourceError::Config { .. }) => Self::SourceUnreadable {
                message: other.to_string(),
            },
        }
    }
}
