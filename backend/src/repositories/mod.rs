//! Database repositories
//!
//! Provides the data access layer for database operations.

pub mod post;
pub mod user;

pub use post::{CommentRecord, LikeRecord, PostRecord, PostRepository, PostWithLikesRecord};
pub use user::{UserRecord, UserRepository};
