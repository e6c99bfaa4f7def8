//! Test utilities with automatic cleanup.
//!
//! Every [`TestEnvironment`] owns a temporary directory that is removed when
//! the environment is dropped, even if the test panics.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use super::comment_repository::CommentRepository;
use super::connection::CsvConnection;
use super::post_repository::PostRepository;
use super::visitor_profile_repository::VisitorProfileRepository;
use crate::config::StoreConfig;
use crate::error::StorageResult;
use crate::io::blob_store::BlobStore;

/// Blob store that keeps uploads in memory and records what was stored
#[derive(Default)]
pub struct RecordingBlobStore {
    stored: Mutex<Vec<(String, String, usize)>>,
}

impl RecordingBlobStore {
    /// `(subfolder, preferred_name, byte count)` for every store call, in order
    pub fn stored(&self) -> Vec<(String, String, usize)> {
        self.stored.lock().unwrap().clone()
    }
}

impl BlobStore for RecordingBlobStore {
    fn store(&self, bytes: &[u8], preferred_name: &str, subfolder: &str) -> StorageResult<String> {
        self.stored.lock().unwrap().push((
            subfolder.to_string(),
            preferred_name.to_string(),
            bytes.len(),
        ));
        Ok(format!("{}/{}", subfolder, preferred_name))
    }
}

pub struct TestEnvironment {
    /// Kept alive until drop
    _temp_dir: TempDir,
    pub connection: CsvConnection,
    pub base_path: PathBuf,
    pub blob_store: Arc<RecordingBlobStore>,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();

        let mut config = StoreConfig::new(base_path.join("data"));
        config.media_root = base_path.join("media");
        let connection = CsvConnection::new(config)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
            blob_store: Arc::new(RecordingBlobStore::default()),
        })
    }

    pub fn post_repository(&self) -> PostRepository {
        PostRepository::new(self.connection.clone(), self.blob_store.clone())
    }

    pub fn comment_repository(&self) -> CommentRepository {
        CommentRepository::new(self.connection.clone())
    }

    pub fn visitor_profile_repository(&self) -> VisitorProfileRepository {
        VisitorProfileRepository::new(self.connection.clone())
    }

    /// Raw contents of a table file, or an empty string if it does not exist yet
    pub fn read_file(&self, path: PathBuf) -> String {
        std::fs::read_to_string(path).unwrap_or_default()
    }
}
