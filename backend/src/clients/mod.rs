//! Outbound integration clients
//!
//! Thin wrappers over the Mailgun, DeepAI, and S3 APIs. Each client is
//! constructed once at startup and cloned into handlers; the email and
//! image clients degrade to warn-and-skip when unconfigured so local
//! development works without credentials.

mod email;
mod images;
mod storage;

pub use email::EmailClient;
pub use images::ImageClient;
pub use storage::StorageClient;

use thiserror::Error;

/// Failure talking to an outbound API
#[derive(Error, Debug)]
pub enum ApiResponseError {
    #[error("API request failed")]
    Request(#[from] reqwest::Error),

    #[error("API request failed with status code {0}")]
    Status(reqwest::StatusCode),

    #[error("API response parsing failed")]
    Parse(#[source] reqwest::Error),
}
