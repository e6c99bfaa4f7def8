//! # Portfolio Store
//!
//! Flat-file persistence for the portfolio site: blog posts, their comments and
//! visitor analytics profiles, each kept as rows of a CSV file.
//!
//! ## Architecture
//!
//! ```text
//! Web layer (routing, forms, templates - not part of this crate)
//!     ↓
//! Domain Layer (models, blog + analytics services)
//!     ↓
//! Storage Layer (CSV tables, repositories)
//!     ↓
//! IO adapters (blob store for uploads, IP geolocation)
//! ```
//!
//! Every repository is built from a [`config::StoreConfig`] passed in at
//! construction; there is no process-wide state. [`app::initialize`] wires the
//! whole stack from one configuration.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod storage;

pub use app::{initialize, AppState};
pub use config::{GeolocationConfig, MediaSettings, StoreConfig};
pub use domain::{AnalyticsService, BlogService};
pub use error::{StorageError, StorageResult};
pub use storage::{
    CommentRepository, CommentStorage, CsvConnection, DeleteOutcome, PostRepository,
    PostStorage, UpdateOutcome, VisitorProfileRepository, VisitorProfileStorage,
};
