//! CSV-backed implementations of the storage traits.

pub mod cell_codec;
pub mod comment_repository;
pub mod connection;
pub mod post_repository;
pub mod repository;
pub mod table;
pub mod visitor_profile_repository;

#[cfg(test)]
pub mod test_utils;

pub use comment_repository::CommentRepository;
pub use connection::CsvConnection;
pub use post_repository::PostRepository;
pub use visitor_profile_repository::VisitorProfileRepository;
