//! # CSV Comment Repository
//!
//! Comments stored in `{data_directory}/comments.csv`, linked to their post by
//! the post's title.
//!
//! ```csv
//! blog_post_title,author,text,created_at
//! Hello,Sam,"Nice post, thanks",2025-01-20T11:02:09.123456-05:00
//! ```
//!
//! Comments are append-only: there is no update or delete.

use log::{debug, info};

use super::connection::CsvConnection;
use super::repository::{CsvRecord, CsvRepository};
use super::table::CsvRow;
use crate::domain::clock::now_in;
use crate::domain::models::Comment;
use crate::error::StorageResult;
use crate::storage::traits::CommentStorage;

impl CsvRecord for Comment {
    const HEADERS: &'static [&'static str] = &["blog_post_title", "author", "text", "created_at"];

    fn to_row(&self) -> StorageResult<Vec<String>> {
        Ok(vec![
            self.blog_post_title.clone(),
            self.author.clone(),
            self.text.clone(),
            self.created_at.clone(),
        ])
    }

    fn from_row(row: &CsvRow) -> Result<Self, String> {
        Ok(Comment {
            blog_post_title: row.get("blog_post_title").to_string(),
            author: row.get("author").to_string(),
            text: row.get("text").to_string(),
            created_at: row.get("created_at").to_string(),
        })
    }
}

#[derive(Clone)]
pub struct CommentRepository {
    connection: CsvConnection,
    records: CsvRepository<Comment>,
}

impl CommentRepository {
    pub fn new(connection: CsvConnection) -> Self {
        let records = CsvRepository::new(connection.config().comments_file());
        Self { connection, records }
    }
}

impl CommentStorage for CommentRepository {
    fn create(&self, blog_post_title: &str, author: &str, text: &str) -> StorageResult<Comment> {
        let comment = Comment {
            blog_post_title: blog_post_title.to_string(),
            author: author.to_string(),
            text: text.to_string(),
            created_at: now_in(self.connection.config().time_zone),
        };

        self.records.append(&comment)?;

        info!("Stored comment by {} on '{}'", comment.author, comment.blog_post_title);
        Ok(comment)
    }

    fn all(&self, blog_post_title: Option<&str>) -> StorageResult<Vec<Comment>> {
        let mut comments = self.records.load()?;
        if let Some(title) = blog_post_title {
            comments.retain(|comment| comment.belongs_to(title));
        }

        debug!("Loaded {} comments (filter: {:?})", comments.len(), blog_post_title);
        Ok(comments)
    }
}
