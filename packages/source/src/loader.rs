//! Loads and concatenates the two yearly exports.

use std::path::Path;

use call_center_source_models::{RawRecordSet, SourceYear};

use crate::SourceError;
use crate::reader::{SourceTable, TableReader, default_readers};

/// Reads both sources with the default reader chain and concatenates them.
///
/// Rows from `first` are tagged [`SourceYear::Y2024`] and precede every row
/// from `second`, tagged [`SourceYear::Y2025`]. Each source keeps its
/// original row order.
///
/// # Errors
///
/// Returns [`SourceError::NotFound`] if either path does not exist, or
/// [`SourceError::Unreadable`] if no reader can parse it.
pub fn load_sources(first: &Path, second: &Path) -> Result<RawRecordSet, SourceError> {
    load_sources_with(first, second, &default_readers())
}

/// Like [`load_sources`] but with an explicit reader chain.
///
/// # Errors
///
/// See [`load_sources`].
pub fn load_sources_with(
    first: &Path,
    second: &Path,
    readers: &[Box<dyn TableReader>],
) -> Result<RawRecordSet, SourceError> {
    let mut raw = RawRecordSet::default();
    for (source, path) in [(SourceYear::Y2024, first), (SourceYear::Y2025, second)] {
        let table = read_source(path, readers)?;
        log::info!(
            "Loaded {} rows ({} columns) for {source} from {}",
            table.rows.len(),
            table.headers.len(),
            path.display()
        );
        raw.append_source(source, &table.headers, table.rows);
    }
    for (source, count) in raw.count_by_source() {
        log::debug!("{source}: {count} rows after concatenation");
    }
    Ok(raw)
}

/// Reads a single source, trying each reader in order.
///
/// # Errors
///
/// Returns [`SourceError::NotFound`] if the path does not exist, or
/// [`SourceError::Unreadable`] with every reader's failure if none succeed.
pub fn read_source(
    path: &Path,
    readers: &[Box<dyn TableReader>],
) -> Result<SourceTable, SourceError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            return Err(SourceError::Unreadable {
                path: path.to_path_buf(),
                message: "not a regular file".to_string(),
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SourceError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(SourceError::Unreadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
        }
    }

    let mut failures = Vec::with_capacity(readers.len());
    for reader in readers {
        match reader.read(path) {
            Ok(table) => return Ok(table),
            Err(e) => {
                log::warn!(
                    "{} reader failed for {}: {e}",
                    reader.name(),
                    path.display()
                );
                failures.push(e.to_string());
            }
        }
    }

    Err(SourceError::Unreadable {
        path: path.to_path_buf(),
        message: if failures.is_empty() {
            "no readers configured".to_string()
        } else {
            failures.join("; ")
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{DelimitedReader, WorkbookReader};
    use std::io::Write as _;
    use std::path::PathBuf;

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        path
    }

    #[test]
    fn concatenates_sources_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(dir.path(), "a.csv", &["UID", "a1", "a2", "a3"]);
        let b = write_csv(dir.path(), "b.csv", &[" UID ", "b1", "b2"]);

        let raw = load_sources(&a, &b).unwrap();
        assert_eq!(raw.len(), 5);
        let ids: Vec<String> = raw.rows.iter().map(|r| r.get_text("UID").unwrap()).collect();
        assert_eq!(ids, vec!["a1", "a2", "a3", "b1", "b2"]);
        let sources: Vec<SourceYear> = raw.rows.iter().map(|r| r.source).collect();
        assert_eq!(
            sources,
            vec![
                SourceYear::Y2024,
                SourceYear::Y2024,
                SourceYear::Y2024,
                SourceYear::Y2025,
                SourceYear::Y2025,
            ]
        );
    }

    #[test]
    fn reads_workbook_and_delimited_sources_together() {
        let dir = tempfile::tempdir().unwrap();
        let workbook = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/incidents.xlsx");
        let csv = write_csv(dir.path(), "b.csv", &["UID,KATEGORI", "b1,Medis"]);

        let raw = load_sources(&workbook, &csv).unwrap();
        let counts = raw.count_by_source();
        assert_eq!(counts[&SourceYear::Y2024], 2);
        assert_eq!(counts[&SourceYear::Y2025], 1);
        assert_eq!(raw.rows[0].get_text("TANGGAL").unwrap(), "2024-03-06 12:00:00");
        assert_eq!(raw.rows[0].get_text("DURASI").unwrap(), "42");
        assert_eq!(raw.rows[2].get_text("KATEGORI").unwrap(), "Medis");
    }

    #[test]
    fn unions_columns_across_sources() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(dir.path(), "a.csv", &["UID,LATITUDE", "a1,0"]);
        let b = write_csv(dir.path(), "b.csv", &["UID,AGENT L1", "b1,Sari"]);

        let raw = load_sources(&a, &b).unwrap();
        assert!(raw.has_column("LATITUDE"));
        assert!(raw.has_column("AGENT L1"));
        assert!(raw.rows[0].get("AGENT L1").is_none());
    }

    #[test]
    fn missing_source_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(dir.path(), "a.csv", &["UID", "a1"]);
        let missing = dir.path().join("missing.xlsx");

        let err = load_sources(&a, &missing).unwrap_err();
        assert!(matches!(err, SourceError::NotFound { path } if path == missing));
    }

    #[test]
    fn falls_back_to_secondary_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "a.csv", &["UID", "a1"]);
        let readers: Vec<Box<dyn TableReader>> =
            vec![Box::new(WorkbookReader), Box::new(DelimitedReader::default())];

        let table = read_source(&path, &readers).unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn unreadable_when_every_reader_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "a.csv", &["UID", "a1"]);
        let readers: Vec<Box<dyn TableReader>> = vec![Box::new(WorkbookReader)];

        let err = read_source(&path, &readers).unwrap_err();
        assert!(matches!(err, SourceError::Unreadable { .. }));
    }

    #[test]
    fn directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_source(dir.path(), &default_readers()).unwrap_err();
        assert!(matches!(err, SourceError::Unreadable { .. }));
    }
}
