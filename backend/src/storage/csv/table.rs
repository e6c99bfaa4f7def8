//! # CSV Table
//!
//! The primitive every repository is built on: one CSV file with a fixed,
//! ordered header.
//!
//! - `ensure_exists` creates the file (and its directories) with only the
//!   header row; an existing file is left alone, header included
//! - `read_all` returns rows in file order, keyed by the file's own header
//! - `append_row` adds one row at the end
//! - `rewrite_all` replaces the whole table through a temp file and a rename

use csv::{ReaderBuilder, Writer};
use log::debug;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::error::StorageResult;

/// One data row, keyed by column name
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    line: u64,
    values: HashMap<String, String>,
}

impl CsvRow {
    /// Value of `column`, or "" when the row or the file lacks it
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }

    /// Line number in the file (the header is line 1)
    pub fn line(&self) -> u64 {
        self.line
    }
}

#[derive(Debug, Clone)]
pub struct CsvTable {
    path: PathBuf,
    headers: &'static [&'static str],
}

impl CsvTable {
    pub fn new(path: impl Into<PathBuf>, headers: &'static [&'static str]) -> Self {
        Self {
            path: path.into(),
            headers,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &'static [&'static str] {
        self.headers
    }

    /// Create the file with its header row if it does not exist yet
    pub fn ensure_exists(&self) -> StorageResult<()> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut csv_writer = Writer::from_writer(BufWriter::new(File::create(&self.path)?));
        csv_writer.write_record(self.headers)?;
        csv_writer.flush()?;

        debug!("Created CSV table {:?}", self.path);
        Ok(())
    }

    /// Read every data row in file order
    pub fn read_all(&self) -> StorageResult<Vec<CsvRow>> {
        self.ensure_exists()?;

        let file = File::open(&self.path)?;
        let mut csv_reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(BufReader::new(file));
        let header = csv_reader.headers()?.clone();

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let values = header
                .iter()
                .zip(record.iter())
                .map(|(column, value)| (column.to_string(), value.to_string()))
                .collect();
            rows.push(CsvRow { line, values });
        }

        Ok(rows)
    }

    /// Append one row; values are positional in header order
    pub fn append_row<I, T>(&self, values: I) -> StorageResult<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.ensure_exists()?;

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut csv_writer = Writer::from_writer(BufWriter::new(file));
        csv_writer.write_record(values)?;
        csv_writer.flush()?;

        Ok(())
    }

    /// Replace the table with the header followed by `rows`
    pub fn rewrite_all(&self, rows: &[Vec<String>]) -> StorageResult<()> {
        self.ensure_exists()?;

        let temp_path = self.path.with_extension("csv.tmp");
        {
            let file = File::create(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));
            csv_writer.write_record(self.headers)?;
            for row in rows {
                csv_writer.write_record(row)?;
            }
            csv_writer.flush()?;
        }

        // Atomically replace the table file
        fs::rename(&temp_path, &self.path)?;

        debug!("Rewrote {} rows to {:?}", rows.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADERS: &[&str] = &["name", "note"];

    fn table_in(temp_dir: &TempDir) -> CsvTable {
        CsvTable::new(temp_dir.path().join("nested").join("things.csv"), HEADERS)
    }

    #[test]
    fn test_ensure_exists_writes_header_and_directories() {
        let temp_dir = TempDir::new().unwrap();
        let table = table_in(&temp_dir);

        table.ensure_exists().unwrap();

        let contents = fs::read_to_string(table.path()).unwrap();
        assert_eq!(contents.lines().collect::<Vec<_>>(), vec!["name,note"]);
    }

    #[test]
    fn test_ensure_exists_is_idempotent_and_does_not_check_header() {
        let temp_dir = TempDir::new().unwrap();
        let table = table_in(&temp_dir);
        fs::create_dir_all(table.path().parent().unwrap()).unwrap();
        fs::write(table.path(), "something,else\n1,2\n").unwrap();

        table.ensure_exists().unwrap();
        table.ensure_exists().unwrap();

        assert_eq!(fs::read_to_string(table.path()).unwrap(), "something,else\n1,2\n");
    }

    #[test]
    fn test_append_and_read_in_file_order() {
        let temp_dir = TempDir::new().unwrap();
        let table = table_in(&temp_dir);

        table.append_row(["first", "plain"]).unwrap();
        table.append_row(["second", "has, a comma"]).unwrap();
        table.append_row(["third", "line one\nline two \"quoted\""]).unwrap();

        let rows = table.read_all().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("name"), "first");
        assert_eq!(rows[1].get("note"), "has, a comma");
        assert_eq!(rows[2].get("note"), "line one\nline two \"quoted\"");
        assert_eq!(rows[0].line(), 2);
    }

    #[test]
    fn test_read_all_tolerates_short_rows() {
        let temp_dir = TempDir::new().unwrap();
        let table = table_in(&temp_dir);
        fs::create_dir_all(table.path().parent().unwrap()).unwrap();
        fs::write(table.path(), "name,note\nonly-name\n").unwrap();

        let rows = table.read_all().unwrap();
        assert_eq!(rows[0].get("name"), "only-name");
        assert_eq!(rows[0].get("note"), "");
        assert_eq!(rows[0].get("no_such_column"), "");
    }

    #[test]
    fn test_rewrite_all_replaces_contents() {
        let temp_dir = TempDir::new().unwrap();
        let table = table_in(&temp_dir);
        table.append_row(["old", "row"]).unwrap();

        table
            .rewrite_all(&[
                vec!["a".to_string(), "1".to_string()],
                vec!["b".to_string(), "2".to_string()],
            ])
            .unwrap();

        let names: Vec<String> = table
            .read_all()
            .unwrap()
            .iter()
            .map(|row| row.get("name").to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(!table.path().with_extension("csv.tmp").exists());
    }

    #[test]
    fn test_rewrite_all_with_no_rows_keeps_header() {
        let temp_dir = TempDir::new().unwrap();
        let table = table_in(&temp_dir);
        table.append_row(["gone", "soon"]).unwrap();

        table.rewrite_all(&[]).unwrap();

        assert!(table.read_all().unwrap().is_empty());
        assert_eq!(fs::read_to_string(table.path()).unwrap().lines().count(), 1);
    }
}
