//! JSON encoding for list-valued cells.
//!
//! A sequence is stored as a JSON array inside a single CSV field, e.g.
//! `"[""/blog/"",""/about/""]"` once CSV quoting is applied.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StorageError, StorageResult};

pub fn encode_sequence<T: Serialize>(column: &'static str, values: &[T]) -> StorageResult<String> {
    serde_json::to_string(values).map_err(|source| StorageError::Encoding { column, source })
}

/// Decode a cell written by `encode_sequence`; a blank cell is an empty sequence
pub fn decode_sequence<T: DeserializeOwned>(column: &'static str, cell: &str) -> StorageResult<Vec<T>> {
    if cell.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(cell).map_err(|source| StorageError::Encoding { column, source })
}
