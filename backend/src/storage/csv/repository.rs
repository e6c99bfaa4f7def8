//! # CSV Table Gateway
//!
//! Generic mapping between records and the rows of one [`CsvTable`]. Each
//! entity repository wraps a `CsvRepository<Entity>` and adds its own rules
//! (id assignment, matching, filtering) on top.

use std::marker::PhantomData;
use std::path::PathBuf;

use super::table::{CsvRow, CsvTable};
use crate::error::{StorageError, StorageResult};

/// A record type that can be stored as one CSV row
pub trait CsvRecord: Sized {
    /// Column names, in the order `to_row` produces values
    const HEADERS: &'static [&'static str];

    fn to_row(&self) -> StorageResult<Vec<String>>;

    /// Build a record from a row; the error is a human-readable reason
    fn from_row(row: &CsvRow) -> Result<Self, String>;
}

pub struct CsvRepository<R> {
    table: CsvTable,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for CsvRepository<R> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: CsvRecord> CsvRepository<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            table: CsvTable::new(path, R::HEADERS),
            _record: PhantomData,
        }
    }

    pub fn table(&self) -> &CsvTable {
        &self.table
    }

    /// Every record in file order; the first row that fails to map is an error
    pub fn load(&self) -> StorageResult<Vec<R>> {
        self.table
            .read_all()?
            .iter()
            .map(|row| {
                R::from_row(row).map_err(|reason| StorageError::MalformedRow {
                    table: self.table.path().to_path_buf(),
                    line: row.line(),
                    reason,
                })
            })
            .collect()
    }

    pub fn append(&self, record: &R) -> StorageResult<()> {
        self.table.append_row(record.to_row()?)
    }

    pub fn replace_all(&self, records: &[R]) -> StorageResult<()> {
        let rows = records
            .iter()
            .map(R::to_row)
            .collect::<StorageResult<Vec<_>>>()?;
        self.table.rewrite_all(&rows)
    }
}
