#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Call-center source loading and record normalization.
//!
//! The two yearly spreadsheet exports are read through a chain of
//! [`reader::TableReader`] strategies, concatenated by [`loader`], and turned
//! into canonical records by [`derive`], which applies the quality-flag
//! rules in [`flags`].

pub mod columns;
pub mod derive;
pub mod flags;
pub mod loader;
pub mod parsing;
pub mod reader;

use std::path::PathBuf;

/// Errors that can occur while loading a source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The source path does not exist.
    #[error("Source not found: {}", path.display())]
    NotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The source exists but no reader could parse it.
    #[error("Source unreadable: {}: {message}", path.display())]
    Unreadable {
        /// The path that was requested.
        path: PathBuf,
        /// Failures from every reader that was tried.
        message: String,
    },

    /// A single reader strategy failed.
    #[error("{reader} reader failed: {message}")]
    Reader {
        /// Name of the reader strategy.
        reader: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    /// Column mapping configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}
