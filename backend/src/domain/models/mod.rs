pub mod comment;
pub mod post;
pub mod visitor_profile;

pub use comment::Comment;
pub use post::{Attachment, NewPost, Post, PostUpdate, Upload};
pub use visitor_profile::{NewVisitorProfile, VisitorProfile};
