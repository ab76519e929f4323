/*!
 * Delimited-file import
 *
 * Reads a CSV-style file row by row, maps each row to a typed value through
 * [`FromColumns`] and hands it to a callback together with running
 * [`Counters`]. Leading lines can be skipped; blank lines always are.
 */

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{Result, SpikeError};

/// Running outcome of an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Counters {
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

impl fmt::Display for Counters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total Imported Items is [{}]: Successful [{}] Skipped [{}] Failed [{}]",
            self.total(),
            self.success,
            self.skipped,
            self.failed
        )
    }
}

/// Positional view of one row
#[derive(Debug, Clone, Copy)]
pub struct Columns<'r> {
    record: &'r StringRecord,
    line: u64,
}

impl<'r> Columns<'r> {
    /// 1-based line the row starts on
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// Column at `index`, or an import error naming the line
    pub fn get(&self, index: usize) -> Result<&'r str> {
        self.record.get(index).ok_or_else(|| SpikeError::Import {
            line: self.line,
            message: format!(
                "missing column {} (row has {} columns)",
                index,
                self.record.len()
            ),
        })
    }

    pub fn get_opt(&self, index: usize) -> Option<&'r str> {
        self.record.get(index)
    }

    /// Column at `index` parsed with `FromStr`
    pub fn parse<T>(&self, index: usize) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self.get(index)?;
        raw.trim().parse().map_err(|e: T::Err| SpikeError::Import {
            line: self.line,
            message: format!("column {}: cannot parse [{}]: {}", index, raw, e),
        })
    }
}

/// Row types built from positional columns
pub trait FromColumns: Sized {
    fn from_columns(columns: &Columns<'_>) -> Result<Self>;
}

/// Reads delimited files into [`FromColumns`] rows
#[derive(Debug, Clone, Copy)]
pub struct CsvImporter {
    delimiter: u8,
}

impl Default for CsvImporter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `delimiter` between columns; must be a single ASCII character
    pub fn with_delimiter(delimiter: char) -> Result<Self> {
        if !delimiter.is_ascii() {
            return Err(SpikeError::Config(format!(
                "CSV delimiter must be an ASCII character, got [{}]",
                delimiter
            )));
        }
        Ok(Self {
            delimiter: delimiter as u8,
        })
    }

    pub fn delimiter(&self) -> char {
        self.delimiter as char
    }

    /// Import `path`, ignoring its first `skip_lines` lines and any blank line
    ///
    /// `process` decides which counter each row lands in. A row that cannot
    /// be mapped stops the import with [`SpikeError::Import`].
    pub fn import<T, F>(&self, path: &Path, skip_lines: usize, mut process: F) -> Result<Counters>
    where
        T: FromColumns,
        F: FnMut(T, &mut Counters),
    {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut counters = Counters::default();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            if line <= skip_lines as u64 {
                continue;
            }
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            let row = T::from_columns(&Columns {
                record: &record,
                line,
            })?;
            process(row, &mut counters);
        }

        tracing::debug!(path = %path.display(), %counters, "CSV import finished");
        Ok(counters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq)]
    struct Item {
        id: u32,
        name: String,
    }

    enum ItemColumn {
        Id = 0,
        Name = 1,
    }

    impl FromColumns for Item {
        fn from_columns(columns: &Columns<'_>) -> Result<Self> {
            Ok(Item {
                id: columns.parse(ItemColumn::Id as usize)?,
                name: columns.get(ItemColumn::Name as usize)?.to_string(),
            })
        }
    }

    fn write_file(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("items.csv");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_counters_total_and_display() {
        let counters = Counters {
            success: 3,
            skipped: 1,
            failed: 2,
        };
        assert_eq!(counters.total(), 6);
        assert_eq!(
            counters.to_string(),
            "Total Imported Items is [6]: Successful [3] Skipped [1] Failed [2]"
        );
    }

    #[test]
    fn test_import_skips_header_and_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "id,name\n1,alpha\n\n2,beta\n   \n3,gamma\n");

        let mut rows = Vec::new();
        let counters = CsvImporter::new()
            .import(&path, 1, |item: Item, counters| {
                if item.id == 2 {
                    counters.skipped += 1;
                } else {
                    counters.success += 1;
                }
                rows.push(item);
            })
            .unwrap();

        assert_eq!(
            rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["alpha", "beta", "gamma"]
        );
        assert_eq!(counters.success, 2);
        assert_eq!(counters.skipped, 1);
        assert_eq!(counters.total(), 3);
    }

    #[test]
    fn test_import_with_custom_delimiter() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "7;seven\n8;eight\n");

        let importer = CsvImporter::with_delimiter(';').unwrap();
        assert_eq!(importer.delimiter(), ';');

        let mut rows = Vec::new();
        importer
            .import(&path, 0, |item: Item, counters| {
                counters.success += 1;
                rows.push(item);
            })
            .unwrap();

        assert_eq!(
            rows,
            vec![
                Item {
                    id: 7,
                    name: "seven".to_string()
                },
                Item {
                    id: 8,
                    name: "eight".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_missing_column_reports_line() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "1,alpha\n2\n");

        let err = CsvImporter::new()
            .import(&path, 0, |_: Item, counters| counters.success += 1)
            .unwrap_err();

        match err {
            SpikeError::Import { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("missing column 1"));
            }
            other => panic!("Expected import error, got {:?}", other),
        }
    }

    #[test]
    fn test_unparsable_column() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "one,alpha\n");

        let err = CsvImporter::new()
            .import(&path, 0, |_: Item, _| {})
            .unwrap_err();
        assert!(matches!(err, SpikeError::Import { line: 1, .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = CsvImporter::new()
            .import(&dir.path().join("absent.csv"), 0, |_: Item, _| {})
            .unwrap_err();
        assert!(matches!(err, SpikeError::Io(_)));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        assert!(matches!(
            CsvImporter::with_delimiter('§'),
            Err(SpikeError::Config(_))
        ));
    }
}
