//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Access token response returned by the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

/// User profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

/// Simple detail message response (registration, confirmation, upload)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detail {
    pub detail: String,
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// New post request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostIn {
    pub body: String,
}

/// A user post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A post together with its like count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithLikes {
    #[serde(flatten)]
    pub post: Post,
    pub likes: i64,
}

/// A post with its like count and comments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithComments {
    pub post: PostWithLikes,
    pub comments: Vec<Comment>,
}

/// Sort order for the post listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostSorting {
    #[default]
    New,
    Old,
    MostLikes,
}

/// New comment request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentIn {
    pub post_id: Uuid,
    pub body: String,
}

/// A comment on a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Like request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeIn {
    pub post_id: Uuid,
}

/// A like on a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostLike {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Upload response with the stored object URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub detail: String,
    pub file_url: String,
}
