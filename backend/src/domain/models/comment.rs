use serde::{Deserialize, Serialize};

/// A reader comment, attached to a post by the post's title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub blog_post_title: String,
    pub author: String,
    pub text: String,
    pub created_at: String,
}

impl Comment {
    pub fn belongs_to(&self, blog_post_title: &str) -> bool {
        self.blog_post_title == blog_post_title
    }
}
