//! # Store Configuration
//!
//! One explicit configuration value handed to every repository and adapter.
//! It can be built in code or read from a YAML file such as:
//!
//! ```yaml
//! data_directory: /srv/portfolio/data
//! media_root: /srv/portfolio/media
//! time_zone: America/New_York
//! media:
//!   media_url: /media/
//! geolocation:
//!   token: abc123
//! ```
//!
//! Any key left out falls back to the production defaults below.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const TAGS_FILE: &str = "tags.csv";
pub const POSTS_FILE: &str = "blogposts.csv";
pub const COMMENTS_FILE: &str = "comments.csv";
pub const VISITOR_PROFILES_FILE: &str = "visitorprofiles.csv";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the CSV tables
    pub data_directory: PathBuf,
    /// Directory the local blob store writes uploads into
    pub media_root: PathBuf,
    pub media: MediaSettings,
    /// Civil time zone used for every stored timestamp
    pub time_zone: Tz,
    /// Number of posts per page on the blog listing
    pub page_size: usize,
    pub geolocation: GeolocationConfig,
}

/// Public URLs used when rendering links to uploaded files
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    pub media_url: String,
    pub placeholder_image_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from("data"),
            media_root: PathBuf::from("media"),
            media: MediaSettings::default(),
            time_zone: chrono_tz::America::New_York,
            page_size: 5,
            geolocation: GeolocationConfig::default(),
        }
    }
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            media_url: "/media/".to_string(),
            placeholder_image_url: "/static/portfolio/images/unknown.png".to_string(),
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ipinfo.io".to_string(),
            token: None,
            timeout_secs: 5,
        }
    }
}

impl StoreConfig {
    /// Default configuration rooted at the given data directory
    pub fn new<P: AsRef<Path>>(data_directory: P) -> Self {
        Self {
            data_directory: data_directory.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read store config {}", path.display()))?;
        let config: StoreConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse store config {}", path.display()))?;

        info!(
            "Loaded store config from {} (data directory: {}, time zone: {})",
            path.display(),
            config.data_directory.display(),
            config.time_zone
        );
        Ok(config)
    }

    pub fn tags_file(&self) -> PathBuf {
        self.data_directory.join(TAGS_FILE)
    }

    pub fn posts_file(&self) -> PathBuf {
        self.data_directory.join(POSTS_FILE)
    }

    pub fn comments_file(&self) -> PathBuf {
        self.data_directory.join(COMMENTS_FILE)
    }

    pub fn visitor_profiles_file(&self) -> PathBuf {
        self.data_directory.join(VISITOR_PROFILES_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::new("/tmp/portfolio");

        assert_eq!(config.posts_file(), PathBuf::from("/tmp/portfolio/blogposts.csv"));
        assert_eq!(config.comments_file(), PathBuf::from("/tmp/portfolio/comments.csv"));
        assert_eq!(config.visitor_profiles_file(), PathBuf::from("/tmp/portfolio/visitorprofiles.csv"));
        assert_eq!(config.tags_file(), PathBuf::from("/tmp/portfolio/tags.csv"));
        assert_eq!(config.time_zone, chrono_tz::America::New_York);
        assert_eq!(config.page_size, 5);
        assert_eq!(config.media.media_url, "/media/");
    }

    #[test]
    fn test_load_partial_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.yaml");
        fs::write(
            &path,
            "data_directory: /srv/data\ntime_zone: Europe/Berlin\ngeolocation:\n  token: secret\n",
        )
        .unwrap();

        let config = StoreConfig::load(&path).unwrap();
        assert_eq!(config.data_directory, PathBuf::from("/srv/data"));
        assert_eq!(config.time_zone, chrono_tz::Europe::Berlin);
        assert_eq!(config.geolocation.token.as_deref(), Some("secret"));
        // Untouched sections keep their defaults
        assert_eq!(config.geolocation.base_url, "https://ipinfo.io");
        assert_eq!(config.media, MediaSettings::default());
    }

    #[test]
    fn test_load_rejects_unknown_time_zone() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.yaml");
        fs::write(&path, "time_zone: Mars/Olympus_Mons\n").unwrap();

        assert!(StoreConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = StoreConfig::load(temp_dir.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read store config"));
    }
}
