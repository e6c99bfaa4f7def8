use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the CSV stores and the blob store.
///
/// A missing record is not an error; see `UpdateOutcome` / `DeleteOutcome`.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file system refused the operation (disk full, permission denied, ...)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A list-valued cell could not be encoded or decoded
    #[error("Invalid JSON in column '{column}': {source}")]
    Encoding {
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed row {line} in {}: {reason}", .table.display())]
    MalformedRow {
        table: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Blob store error: {0}")]
    BlobStore(String),
}

impl StorageError {
    /// True when the underlying cause is a file system failure
    pub fn is_io(&self) -> bool {
        match self {
            StorageError::Io(_) => true,
            StorageError::Csv(err) => matches!(err.kind(), csv::ErrorKind::Io(_)),
            _ => false,
        }
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
