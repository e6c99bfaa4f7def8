//! # CSV Post Repository
//!
//! Blog posts stored in `{data_directory}/blogposts.csv`.
//!
//! ## CSV Format
//!
//! ```csv
//! id,title,content,image,pdf,published_date,author
//! 4f7c...,Hello,"<p>First post</p>",blog_images/cover.png,,2025-01-20T10:00:00.000000-05:00,Dana
//! ```
//!
//! The `image` and `pdf` columns hold blob-store paths (empty when absent).
//!
//! ## Features
//!
//! - Uploads written to the blob store before the row is appended
//! - UUID ids assigned on create, and on read for rows stored without one
//! - Whole-table rewrite (temp file + rename) on update and delete

use log::{debug, info, warn};
use std::sync::Arc;

use super::connection::CsvConnection;
use super::repository::{CsvRecord, CsvRepository};
use super::table::CsvRow;
use crate::domain::clock::now_in;
use crate::domain::models::{Attachment, NewPost, Post, PostUpdate};
use crate::error::{StorageError, StorageResult};
use crate::io::blob_store::BlobStore;
use crate::storage::traits::{DeleteOutcome, PostStorage, UpdateOutcome};

pub const IMAGE_FOLDER: &str = "blog_images";
pub const PDF_FOLDER: &str = "blog_pdfs";

impl CsvRecord for Post {
    const HEADERS: &'static [&'static str] =
        &["id", "title", "content", "image", "pdf", "published_date", "author"];

    fn to_row(&self) -> StorageResult<Vec<String>> {
        Ok(vec![
            self.id.clone(),
            self.title.clone(),
            self.content.clone(),
            self.image_path.clone(),
            self.pdf_path.clone(),
            self.published_date.clone(),
            self.author.clone(),
        ])
    }

    fn from_row(row: &CsvRow) -> Result<Self, String> {
        Ok(Post {
            id: row.get("id").to_string(),
            title: row.get("title").to_string(),
            content: row.get("content").to_string(),
            image_path: row.get("image").to_string(),
            pdf_path: row.get("pdf").to_string(),
            published_date: row.get("published_date").to_string(),
            author: row.get("author").to_string(),
        })
    }
}

/// CSV-based blog post repository
#[derive(Clone)]
pub struct PostRepository {
    connection: CsvConnection,
    records: CsvRepository<Post>,
    blob_store: Arc<dyn BlobStore>,
}

impl PostRepository {
    pub fn new(connection: CsvConnection, blob_store: Arc<dyn BlobStore>) -> Self {
        let records = CsvRepository::new(connection.config().posts_file());
        Self {
            connection,
            records,
            blob_store,
        }
    }

    /// Turn an optional attachment into the path stored in the row
    fn resolve_attachment(&self, attachment: Option<Attachment>, subfolder: &str) -> StorageResult<String> {
        match attachment {
            None => Ok(String::new()),
            Some(Attachment::Stored(path)) => Ok(path),
            Some(Attachment::Upload(upload)) => {
                if upload.file_name.trim().is_empty() {
                    return Err(StorageError::BlobStore(format!(
                        "Upload for {} has no file name",
                        subfolder
                    )));
                }
                self.blob_store.store(&upload.bytes, &upload.file_name, subfolder)
            }
        }
    }
}

impl PostStorage for PostRepository {
    fn create(&self, new_post: NewPost) -> StorageResult<Post> {
        info!("Storing blog post in CSV: {}", new_post.title);

        let image_path = self.resolve_attachment(new_post.image, IMAGE_FOLDER)?;
        let pdf_path = self.resolve_attachment(new_post.pdf, PDF_FOLDER)?;

        let time_zone = self.connection.config().time_zone;
        let post = Post {
            id: new_post
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(Post::generate_id),
            title: new_post.title,
            content: new_post.content,
            image_path,
            pdf_path,
            published_date: new_post
                .published_date
                .filter(|date| !date.is_empty())
                .unwrap_or_else(|| now_in(time_zone)),
            author: new_post.author,
        };

        self.records.append(&post)?;

        info!("Successfully stored blog post: {}", post.id);
        Ok(post)
    }

    fn all(&self) -> StorageResult<Vec<Post>> {
        let mut posts = self.records.load()?;

        let mut repaired = 0;
        for post in posts.iter_mut().filter(|post| post.id.is_empty()) {
            post.id = Post::generate_id();
            repaired += 1;
        }

        if repaired > 0 {
            warn!(
                "Assigned ids to {} blog posts stored without one; rewriting {:?}",
                repaired,
                self.records.table().path()
            );
            self.records.replace_all(&posts)?;
        }

        debug!("Loaded {} blog posts", posts.len());
        Ok(posts)
    }

    fn find(&self, id: &str) -> StorageResult<Option<Post>> {
        Ok(self.all()?.into_iter().find(|post| post.id == id))
    }

    fn update(&self, id: &str, changes: &PostUpdate) -> StorageResult<UpdateOutcome> {
        info!("Updating blog post in CSV: {}", id);

        let mut posts = self.all()?;
        let mut matched = 0;
        for post in posts.iter_mut().filter(|post| post.id == id) {
            changes.apply_to(post);
            matched += 1;
        }

        if matched == 0 {
            info!("No blog post with id {}; nothing updated", id);
            return Ok(UpdateOutcome::Unchanged);
        }

        self.records.replace_all(&posts)?;

        info!("Successfully updated blog post: {}", id);
        Ok(UpdateOutcome::Updated { matched })
    }

    fn delete(&self, id: &str) -> StorageResult<DeleteOutcome> {
        info!("Deleting blog post from CSV: {}", id);

        let mut posts = self.all()?;
        let before = posts.len();
        posts.retain(|post| post.id != id);
        let removed = before - posts.len();

        if removed == 0 {
            info!("No blog post with id {}; nothing deleted", id);
            return Ok(DeleteOutcome::Unchanged);
        }

        self.records.replace_all(&posts)?;

        info!("Successfully deleted blog post: {}", id);
        Ok(DeleteOutcome::Deleted { removed })
    }
}
