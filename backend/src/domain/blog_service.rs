//! Blog service: what the blog pages need from the post and comment stores.
//!
//! ## Business Rules
//!
//! - Listing is newest first, by parsed `published_date`; rows whose date does
//!   not parse go last, in file order
//! - Page numbers outside `1..=num_pages` are clamped; an empty blog has one
//!   empty page
//! - Titles are limited to 200 characters, author names and comment text to 100
//! - Comments belong to a post through its title

use anyhow::{bail, Context, Result};
use log::info;
use shared::{CreateCommentRequest, CreatePostRequest};
use std::cmp::Reverse;
use std::sync::Arc;

use crate::domain::models::{Attachment, Comment, NewPost, Post, Upload};
use crate::storage::traits::{CommentStorage, DeleteOutcome, PostStorage};

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_AUTHOR_LENGTH: usize = 100;
pub const MAX_COMMENT_LENGTH: usize = 100;

/// One page of the post listing
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    /// 1-based page number actually served
    pub number: usize,
    pub num_pages: usize,
    /// Number of posts across all pages
    pub total: usize,
}

impl PostPage {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
}

#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostStorage>,
    comments: Arc<dyn CommentStorage>,
    page_size: usize,
}

fn check_required(field: &str, value: &str, max_length: Option<usize>) -> Result<()> {
    if value.trim().is_empty() {
        bail!("{} cannot be empty", field);
    }
    if let Some(max_length) = max_length {
        if value.chars().count() > max_length {
            bail!("{} cannot exceed {} characters", field, max_length);
        }
    }
    Ok(())
}

impl BlogService {
    pub fn new(posts: Arc<dyn PostStorage>, comments: Arc<dyn CommentStorage>, page_size: usize) -> Self {
        Self {
            posts,
            comments,
            page_size: page_size.max(1),
        }
    }

    /// Posts newest first
    pub fn list(&self) -> Result<Vec<Post>> {
        let mut posts = self.posts.all().context("Failed to load blog posts")?;
        posts.sort_by_key(|post| Reverse(post.published_at()));
        Ok(posts)
    }

    pub fn page(&self, page_number: usize) -> Result<PostPage> {
        let posts = self.list()?;
        let total = posts.len();
        let num_pages = total.div_ceil(self.page_size).max(1);
        let number = page_number.clamp(1, num_pages);

        let posts = posts
            .into_iter()
            .skip((number - 1) * self.page_size)
            .take(self.page_size)
            .collect();

        Ok(PostPage {
            posts,
            number,
            num_pages,
            total,
        })
    }

    pub fn detail(&self, id: &str) -> Result<Option<PostDetail>> {
        let Some(post) = self.posts.find(id).context("Failed to load blog post")? else {
            return Ok(None);
        };
        let comments = self
            .comments
            .all(Some(&post.title))
            .context("Failed to load comments")?;

        Ok(Some(PostDetail { post, comments }))
    }

    pub fn publish(&self, request: CreatePostRequest, image: Option<Upload>, pdf: Option<Upload>) -> Result<Post> {
        check_required("Title", &request.title, Some(MAX_TITLE_LENGTH))?;
        check_required("Content", &request.content, None)?;
        check_required("Author", &request.author, Some(MAX_AUTHOR_LENGTH))?;

        let mut new_post = NewPost::new(request.title, request.content, request.author);
        new_post.image = image.map(Attachment::Upload);
        new_post.pdf = pdf.map(Attachment::Upload);

        let post = self.posts.create(new_post).context("Failed to publish blog post")?;
        info!("Published blog post {} ({})", post.id, post.title);
        Ok(post)
    }

    pub fn add_comment(&self, request: CreateCommentRequest) -> Result<Comment> {
        check_required("Author", &request.author, Some(MAX_AUTHOR_LENGTH))?;
        check_required("Comment", &request.text, Some(MAX_COMMENT_LENGTH))?;

        self.comments
            .create(&request.blog_post_title, &request.author, &request.text)
            .context("Failed to store comment")
    }

    /// Delete a post; returns false when no post had the id
    pub fn delete_post(&self, id: &str) -> Result<bool> {
        let outcome = self.posts.delete(id).context("Failed to delete blog post")?;
        Ok(matches!(outcome, DeleteOutcome::Deleted { .. }))
    }
}
