use log::info;
use std::fs;
use std::sync::Arc;

use super::table::CsvTable;
use crate::config::StoreConfig;
use crate::error::StorageResult;

/// Columns of the (currently unused) tags table
pub const TAG_HEADERS: &[&str] = &["name"];

/// CsvConnection hands out table locations from one shared configuration
#[derive(Clone)]
pub struct CsvConnection {
    config: Arc<StoreConfig>,
}

impl CsvConnection {
    /// Create a new CSV connection, creating the data directory if needed
    pub fn new(config: StoreConfig) -> StorageResult<Self> {
        if !config.data_directory.exists() {
            fs::create_dir_all(&config.data_directory)?;
            info!("Created data directory: {}", config.data_directory.display());
        }

        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn tags_table(&self) -> CsvTable {
        CsvTable::new(self.config.tags_file(), TAG_HEADERS)
    }

    /// Make sure every table file exists with its header row
    pub fn initialize(&self) -> StorageResult<()> {
        use super::repository::CsvRecord;
        use crate::domain::models::{Comment, Post, VisitorProfile};

        self.tags_table().ensure_exists()?;
        CsvTable::new(self.config.posts_file(), Post::HEADERS).ensure_exists()?;
        CsvTable::new(self.config.comments_file(), Comment::HEADERS).ensure_exists()?;
        CsvTable::new(self.config.visitor_profiles_file(), VisitorProfile::HEADERS).ensure_exists()?;

        info!("CSV tables ready in {}", self.config.data_directory.display());
        Ok(())
    }
}
