use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::MediaSettings;
use crate::domain::clock::parse_timestamp;

/// Number of characters shown in a post preview
pub const PREVIEW_LENGTH: usize = 100;

/// A blog post as stored in the posts table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Blob-store path of the header image, empty when none was uploaded
    pub image_path: String,
    /// Blob-store path of the attached PDF, empty when none was uploaded
    pub pdf_path: String,
    pub published_date: String,
    pub author: String,
}

impl Post {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.published_date)
    }

    /// Public URL of the header image, or the placeholder image
    pub fn image_url(&self, media: &MediaSettings) -> String {
        if self.image_path.is_empty() {
            return media.placeholder_image_url.clone();
        }
        media_link(&media.media_url, &self.image_path)
    }

    /// Public, percent-encoded URL of the attached PDF
    pub fn pdf_url(&self, media: &MediaSettings) -> Option<String> {
        if self.pdf_path.is_empty() {
            return None;
        }
        let encoded = self
            .pdf_path
            .split('/')
            .map(urlencoding::encode)
            .collect::<Vec<_>>()
            .join("/");
        Some(media_link(&media.media_url, &encoded))
    }

    /// First 100 characters of the content followed by "...".
    ///
    /// The marker is appended even when the content is shorter.
    pub fn content_preview(&self) -> String {
        let preview: String = self.content.chars().take(PREVIEW_LENGTH).collect();
        format!("{}...", preview)
    }
}

fn media_link(media_url: &str, path: &str) -> String {
    format!("{}/{}", media_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Uploaded file content submitted with a post
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    /// Original file name as sent by the browser
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    /// Already stored in the blob store; the value is its relative path
    Stored(String),
    /// Raw upload that still has to be written to the blob store
    Upload(Upload),
}

/// Input for creating a post
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: String,
    pub image: Option<Attachment>,
    pub pdf: Option<Attachment>,
    /// Preassigned id; a fresh one is generated when absent
    pub id: Option<String>,
    /// Preassigned publication time; "now" is used when absent
    pub published_date: Option<String>,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author: author.into(),
            image: None,
            pdf: None,
            id: None,
            published_date: None,
        }
    }

    pub fn with_image(mut self, image: Attachment) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_pdf(mut self, pdf: Attachment) -> Self {
        self.pdf = Some(pdf);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_published_date(mut self, published_date: impl Into<String>) -> Self {
        self.published_date = Some(published_date.into());
        self
    }
}

/// Field overwrites applied by an update; `None` leaves a field as it is
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub image_path: Option<String>,
    pub pdf_path: Option<String>,
    pub published_date: Option<String>,
}

impl PostUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn image_path(mut self, image_path: impl Into<String>) -> Self {
        self.image_path = Some(image_path.into());
        self
    }

    pub fn pdf_path(mut self, pdf_path: impl Into<String>) -> Self {
        self.pdf_path = Some(pdf_path.into());
        self
    }

    pub fn published_date(mut self, published_date: impl Into<String>) -> Self {
        self.published_date = Some(published_date.into());
        self
    }

    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(author) = &self.author {
            post.author = author.clone();
        }
        if let Some(image_path) = &self.image_path {
            post.image_path = image_path.clone();
        }
        if let Some(pdf_path) = &self.pdf_path {
            post.pdf_path = pdf_path.clone();
        }
        if let Some(published_date) = &self.published_date {
            post.published_date = published_date.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> Post {
        Post {
            id: "b7c1".to_string(),
            title: "Rust on the server".to_string(),
            content: "Short body".to_string(),
            image_path: String::new(),
            pdf_path: String::new(),
            published_date: "2025-01-20T10:00:00-05:00".to_string(),
            author: "Dana".to_string(),
        }
    }

    #[test]
    fn test_image_url_uses_placeholder_without_image() {
        let media = MediaSettings::default();
        let mut post = sample_post();
        assert_eq!(post.image_url(&media), "/static/portfolio/images/unknown.png");

        post.image_path = "blog_images/cover.png".to_string();
        assert_eq!(post.image_url(&media), "/media/blog_images/cover.png");
    }

    #[test]
    fn test_pdf_url_is_percent_encoded() {
        let media = MediaSettings::default();
        let mut post = sample_post();
        assert_eq!(post.pdf_url(&media), None);

        post.pdf_path = "blog_pdfs/My Résumé (final).pdf".to_string();
        assert_eq!(
            post.pdf_url(&media).as_deref(),
            Some("/media/blog_pdfs/My%20R%C3%A9sum%C3%A9%20%28final%29.pdf")
        );
    }

    #[test]
    fn test_content_preview_truncates_long_content() {
        let mut post = sample_post();
        post.content = "x".repeat(250);

        let preview = post.content_preview();
        assert_eq!(preview.len(), PREVIEW_LENGTH + 3);
        assert!(preview.ends_with("x..."));
    }

    #[test]
    fn test_content_preview_short_content_still_gets_marker() {
        let post = sample_post();
        assert_eq!(post.content_preview(), "Short body...");

        let mut empty = sample_post();
        empty.content = String::new();
        assert_eq!(empty.content_preview(), "...");
    }

    #[test]
    fn test_content_preview_counts_characters_not_bytes() {
        let mut post = sample_post();
        post.content = "é".repeat(120);

        let preview = post.content_preview();
        assert_eq!(preview.chars().count(), PREVIEW_LENGTH + 3);
    }

    #[test]
    fn test_post_update_only_touches_given_fields() {
        let mut post = sample_post();
        PostUpdate::default().title("New title").apply_to(&mut post);

        let mut expected = sample_post();
        expected.title = "New title".to_string();
        assert_eq!(post, expected);
    }

    #[test]
    fn test_published_at() {
        let mut post = sample_post();
        assert!(post.published_at().is_some());

        post.published_date = "not a date".to_string();
        assert!(post.published_at().is_none());
    }
}
