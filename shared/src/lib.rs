//! Social Media API Shared Library
//!
//! This crate contains the request/response types and validation helpers
//! shared between the backend and any API clients.

pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use models::*;
pub use types::*;
