//! # Domain Module
//!
//! Business logic on top of the storage traits.
//!
//! - **`analytics_service`**: visitor profile creation and tracking events
//! - **`blog_service`**: post listing, detail pages, publishing and comments
//! - **`clock`**: timestamps in the configured civil time zone
//! - **`models`**: the records kept in the CSV tables

pub mod analytics_service;
pub mod blog_service;
pub mod clock;
pub mod models;

pub use analytics_service::{AnalyticsService, TrackOutcome, VisitOutcome, VisitRequest};
pub use blog_service::{BlogService, PostDetail, PostPage};
