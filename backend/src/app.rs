//! Wiring: builds every store and service from one [`StoreConfig`].

use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;

use crate::config::StoreConfig;
use crate::domain::{AnalyticsService, BlogService};
use crate::io::blob_store::{BlobStore, LocalBlobStore};
use crate::io::geolocation::{GeoLocator, IpInfoLocator};
use crate::storage::csv::{CommentRepository, CsvConnection, PostRepository, VisitorProfileRepository};

#[derive(Clone)]
pub struct AppState {
    pub connection: CsvConnection,
    pub blog_service: BlogService,
    pub analytics_service: AnalyticsService,
}

/// Initialize the data directory and every service on top of it
pub fn initialize(config: StoreConfig) -> Result<AppState> {
    let locator: Arc<dyn GeoLocator> =
        Arc::new(IpInfoLocator::new(&config.geolocation).context("Failed to set up geolocation")?);
    initialize_with_locator(config, locator)
}

/// Same as [`initialize`], with a caller-provided geolocation service
pub fn initialize_with_locator(config: StoreConfig, locator: Arc<dyn GeoLocator>) -> Result<AppState> {
    info!("Setting up CSV storage in {}", config.data_directory.display());
    let blob_store: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::from_config(&config));
    let connection = CsvConnection::new(config).context("Failed to open data directory")?;
    connection.initialize().context("Failed to create CSV tables")?;

    info!("Setting up domain services");
    let config = connection.config();
    let blog_service = BlogService::new(
        Arc::new(PostRepository::new(connection.clone(), blob_store)),
        Arc::new(CommentRepository::new(connection.clone())),
        config.page_size,
    );
    let analytics_service = AnalyticsService::new(
        Arc::new(VisitorProfileRepository::new(connection.clone())),
        locator,
        config.time_zone,
    );

    Ok(AppState {
        connection,
        blog_service,
        analytics_service,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VisitRequest;
    use crate::domain::VisitOutcome;
    use shared::{CreatePostRequest, TrackingEventRequest};
    use tempfile::TempDir;

    fn config_in(temp_dir: &TempDir) -> StoreConfig {
        let mut config = StoreConfig::new(temp_dir.path().join("data"));
        config.media_root = temp_dir.path().join("media");
        config.geolocation.base_url = "http://127.0.0.1:1".to_string();
        config.geolocation.timeout_secs = 1;
        config
    }

    #[test]
    fn test_initialize_creates_tables() {
        let temp_dir = TempDir::new().unwrap();
        let state = initialize(config_in(&temp_dir)).unwrap();

        let config = state.connection.config();
        assert!(config.posts_file().exists());
        assert!(config.comments_file().exists());
        assert!(config.visitor_profiles_file().exists());
        assert!(config.tags_file().exists());
    }

    #[tokio::test]
    async fn test_services_share_the_data_directory() {
        let temp_dir = TempDir::new().unwrap();
        let state = initialize(config_in(&temp_dir)).unwrap();

        let post = state
            .blog_service
            .publish(
                CreatePostRequest {
                    title: "Hello".to_string(),
                    content: "<p>Hi</p>".to_string(),
                    author: "Dana".to_string(),
                },
                Some(crate::domain::models::Upload {
                    file_name: "my cover.png".to_string(),
                    bytes: vec![7; 4],
                }),
                None,
            )
            .unwrap();
        assert_eq!(post.image_path, "blog_images/my_cover.png");
        assert!(temp_dir.path().join("media/blog_images/my_cover.png").exists());

        let visit = state
            .analytics_service
            .record_visit(VisitRequest {
                session_id: "sess-1".to_string(),
                path: "/blog/".to_string(),
                ip_address: "203.0.113.7".to_string(),
                user_agent: "curl/8.0".to_string(),
                ..VisitRequest::default()
            })
            .unwrap();
        assert!(matches!(visit, VisitOutcome::Created(_)));

        state
            .analytics_service
            .track("sess-1", "203.0.113.7", TrackingEventRequest::default())
            .await
            .unwrap();
        assert_eq!(state.blog_service.page(1).unwrap().total, 1);
    }
}
