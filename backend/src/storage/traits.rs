//! # Storage Traits
//!
//! Storage contracts the domain layer works against, so services can be tested
//! with any backend.

use crate::domain::models::{Comment, NewPost, NewVisitorProfile, Post, PostUpdate, VisitorProfile};
use crate::error::StorageResult;

/// Result of an update that may not find its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// `matched` records were rewritten
    Updated { matched: usize },
    /// Nothing matched; the table was left untouched
    Unchanged,
}

/// Result of a delete that may not find its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { removed: usize },
    Unchanged,
}

/// Trait defining the interface for blog post storage operations
pub trait PostStorage: Send + Sync {
    /// Store a new post, writing any raw uploads to the blob store first
    fn create(&self, new_post: NewPost) -> StorageResult<Post>;

    /// All posts in file order.
    ///
    /// Rows stored without an id are given one, and the table is rewritten
    /// once to persist the repair.
    fn all(&self) -> StorageResult<Vec<Post>>;

    fn find(&self, id: &str) -> StorageResult<Option<Post>>;

    /// Apply field overwrites to every post with the given id
    fn update(&self, id: &str, changes: &PostUpdate) -> StorageResult<UpdateOutcome>;

    /// Remove every post with the given id, keeping the order of the rest
    fn delete(&self, id: &str) -> StorageResult<DeleteOutcome>;
}

/// Trait defining the interface for comment storage operations
pub trait CommentStorage: Send + Sync {
    fn create(&self, blog_post_title: &str, author: &str, text: &str) -> StorageResult<Comment>;

    /// All comments in file order, or only those whose title matches exactly
    fn all(&self, blog_post_title: Option<&str>) -> StorageResult<Vec<Comment>>;
}

/// Trait defining the interface for visitor profile storage operations
pub trait VisitorProfileStorage: Send + Sync {
    /// Store a new profile. Duplicate session ids are not rejected.
    fn create(&self, new_profile: NewVisitorProfile) -> StorageResult<VisitorProfile>;

    fn all(&self) -> StorageResult<Vec<VisitorProfile>>;

    /// First profile stored for the session
    fn find(&self, session_id: &str) -> StorageResult<Option<VisitorProfile>>;

    /// Copy activity, attribution, location and last-seen time from `profile`
    /// onto every stored profile with the same session id
    fn update(&self, profile: &VisitorProfile) -> StorageResult<UpdateOutcome>;

    fn delete(&self, session_id: &str) -> StorageResult<DeleteOutcome>;
}
