//! # Storage Module
//!
//! Persistence for posts, comments and visitor profiles.
//!
//! Each entity lives in its own CSV file under the configured data directory:
//!
//! ```text
//! data/
//! ├── tags.csv
//! ├── blogposts.csv
//! ├── comments.csv
//! └── visitorprofiles.csv
//! ```
//!
//! ## Design
//!
//! - **Table primitive**: `csv::table::CsvTable` owns header initialization,
//!   read-all, append and whole-file rewrite
//! - **Table gateway**: `csv::repository::CsvRepository<R>` maps rows to records
//!   for any type implementing `CsvRecord`
//! - **Repositories**: one per entity, implementing the traits in [`traits`]
//!
//! ## Known limits
//!
//! Every update or delete reads the whole file, edits it in memory and writes it
//! back. There is no locking: two concurrent writers can lose one another's
//! changes. Rewrites go through a temporary file and an atomic rename, so a
//! reader never sees a half-written table.

pub mod csv;
pub mod traits;

pub use self::csv::{CommentRepository, CsvConnection, PostRepository, VisitorProfileRepository};
pub use traits::{CommentStorage, DeleteOutcome, PostStorage, UpdateOutcome, VisitorProfileStorage};
