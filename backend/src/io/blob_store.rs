//! # Blob Store
//!
//! Where uploaded images and PDFs end up. Posts only keep the relative path
//! returned by [`BlobStore::store`].

use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::{StorageError, StorageResult};

pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `subfolder`, preferably as `preferred_name`.
    ///
    /// Returns the path relative to the store root, with `/` separators.
    fn store(&self, bytes: &[u8], preferred_name: &str, subfolder: &str) -> StorageResult<String>;
}

/// Blob store writing into a directory on the local file system
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.media_root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reduce a browser-supplied file name to a safe single path component.
    ///
    /// Directory parts are dropped, whitespace becomes `_`, and anything other
    /// than alphanumerics, `-`, `_` and `.` is removed.
    pub fn clean_file_name(name: &str) -> Option<String> {
        let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("");
        let cleaned: String = base
            .trim()
            .chars()
            .filter_map(|c| {
                if c.is_whitespace() {
                    Some('_')
                } else if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    Some(c)
                } else {
                    None
                }
            })
            .collect();

        if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
            None
        } else {
            Some(cleaned)
        }
    }

    /// First free name in `directory`, adding a random suffix on collision
    fn available_name(directory: &Path, file_name: &str) -> String {
        if !directory.join(file_name).exists() {
            return file_name.to_string();
        }

        let (stem, extension) = match file_name.rfind('.') {
            Some(index) if index > 0 => file_name.split_at(index),
            _ => (file_name, ""),
        };

        loop {
            let suffix: String = Uuid::new_v4().simple().to_string().chars().take(7).collect();
            let candidate = format!("{}_{}{}", stem, suffix, extension);
            if !directory.join(&candidate).exists() {
                return candidate;
            }
        }
    }
}

impl BlobStore for LocalBlobStore {
    fn store(&self, bytes: &[u8], preferred_name: &str, subfolder: &str) -> StorageResult<String> {
        let file_name = Self::clean_file_name(preferred_name).ok_or_else(|| {
            StorageError::BlobStore(format!("Invalid upload file name: {:?}", preferred_name))
        })?;

        let subfolder = subfolder.trim_matches('/');
        let directory = self.root.join(subfolder);
        if !directory.exists() {
            fs::create_dir_all(&directory)?;
            debug!("Created media directory: {:?}", directory);
        }

        let file_name = Self::available_name(&directory, &file_name);
        fs::write(directory.join(&file_name), bytes)?;

        let relative_path = if subfolder.is_empty() {
            file_name
        } else {
            format!("{}/{}", subfolder, file_name)
        };
        info!("Stored upload ({} bytes) at {}", bytes.len(), relative_path);
        Ok(relative_path)
    }
}
