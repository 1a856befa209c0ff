//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and external systems.

pub mod post;
pub mod user;

pub use post::PostService;
pub use user::UserService;
