//! Tabular reader strategies.
//!
//! A source file is read by trying each [`TableReader`] in order until one
//! succeeds. The default chain is [`WorkbookReader`] (xlsx/xls/xlsb/ods via
//! `calamine`) followed by [`DelimitedReader`] (CSV).

use std::path::Path;

use calamine::{Data, Reader as _, open_workbook_auto};
use serde_json::Value;

use crate::SourceError;

/// A header row plus positional data rows, as read from one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    /// Header cells of the first row, untrimmed.
    pub headers: Vec<String>,
    /// Data rows, each aligned with `headers`.
    pub rows: Vec<Vec<Value>>,
}

/// A strategy for reading one tabular file.
pub trait TableReader: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Reads the file into a [`SourceTable`].
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Reader`] if this strategy cannot parse the file.
    fn read(&self, path: &Path) -> Result<SourceTable, SourceError>;
}

/// Reads the first worksheet of a spreadsheet workbook.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookReader;

impl WorkbookReader {
    fn error(message: impl std::fmt::Display) -> SourceError {
        SourceError::Reader {
            reader: "workbook",
            message: message.to_string(),
        }
    }
}

impl TableReader for WorkbookReader {
    fn name(&self) -> &'static str {
        "workbook"
    }

    fn read(&self, path: &Path) -> Result<SourceTable, SourceError> {
        let mut workbook = open_workbook_auto(path).map_err(Self::error)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Self::error("workbook has no worksheets"))?
            .map_err(Self::error)?;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(SourceTable::default());
        };
        let headers = header_row
            .iter()
            .map(|cell| match cell_to_value(cell) {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect();

        let rows = rows
            .map(|row| row.iter().map(cell_to_value).collect())
            .collect();

        Ok(SourceTable { headers, rows })
    }
}

/// Converts a workbook cell to an untyped value. Date cells become
/// `YYYY-MM-DD HH:MM:SS` text; empty and error cells become `null`.
fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => dt.as_datetime().map_or_else(
            || {
                serde_json::Number::from_f64(dt.as_f64()).map_or(Value::Null, Value::Number)
            },
            |ts| Value::String(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
        ),
        Data::Error(_) | Data::Empty => Value::Null,
    }
}

/// Reads a delimited text file whose first row is the header.
#[derive(Debug, Clone, Copy)]
pub struct DelimitedReader {
    /// Field delimiter byte.
    delimiter: u8,
}

impl Default for DelimitedReader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl DelimitedReader {
    /// Sets the field delimiter (e.g. `b';'` for locale-specific exports).
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn error(message: impl std::fmt::Display) -> SourceError {
        SourceError::Reader {
            reader: "delimited",
            message: message.to_string(),
        }
    }
}

impl TableReader for DelimitedReader {
    fn name(&self) -> &'static str {
        "delimited"
    }

    fn read(&self, path: &Path) -> Result<SourceTable, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_path(path)
            .map_err(Self::error)?;

        let headers = reader
            .headers()
            .map_err(Self::error)?
            .iter()
            .map(String::from)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(Self::error)?;
            rows.push(
                record
                    .iter()
                    .map(|field| {
                        if field.trim().is_empty() {
                            Value::Null
                        } else {
                            Value::String(field.to_string())
                        }
                    })
                    .collect(),
            );
        }

        Ok(SourceTable { headers, rows })
    }
}

/// The default reader chain: workbook first, then delimited text.
#[must_use]
pub fn default_readers() -> Vec<Box<dyn TableReader>> {
    vec![
        Box::new(WorkbookReader),
        Box::new(DelimitedReader::default()),
    ]
}
