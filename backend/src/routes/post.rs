//! Post, comment, and like routes

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::services::PostService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use social_media_shared::types::{
    Comment, CommentIn, LikeIn, Post, PostIn, PostLike, PostSorting, PostWithComments,
    PostWithLikes,
};
use tracing::warn;
use uuid::Uuid;

/// Create post routes
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/post", post(create_post).get(get_all_posts))
        .route("/post/:post_id", get(get_post_with_comments))
        .route("/post/:post_id/comment", get(get_comments_on_post))
        .route("/comment", post(create_comment))
        .route("/like", post(like_post))
}

/// Query parameters for post creation
#[derive(Debug, Deserialize)]
struct CreatePostQuery {
    /// Optional prompt for background image generation
    prompt: Option<String>,
}

/// Create a post (requires authentication)
///
/// POST /post?prompt=...
///
/// When a prompt is given, image generation runs as a background task
/// and attaches the image URL to the post once done.
async fn create_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<CreatePostQuery>,
    Json(req): Json<PostIn>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let created = PostService::create_post(&state.db, user.id, &req.body).await?;

    if let Some(prompt) = query.prompt {
        if state.images().is_configured() {
            tokio::spawn(PostService::generate_and_attach_image(
                state.db.clone(),
                state.images().clone(),
                state.mailer().clone(),
                user.email,
                created.id,
                prompt,
            ));
        } else {
            warn!("Image generation not configured; ignoring prompt");
        }
    }

    Ok((StatusCode::CREATED, Json(created)))
}

/// Query parameters for the post listing
#[derive(Debug, Deserialize)]
struct PostListQuery {
    #[serde(default)]
    sorting: PostSorting,
}

/// List all posts with like counts
///
/// GET /post?sorting=new|old|most_likes
async fn get_all_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> ApiResult<Json<Vec<PostWithLikes>>> {
    let posts = PostService::list_posts(&state.db, query.sorting).await?;
    Ok(Json(posts))
}

/// Get a post with its like count and comments
///
/// GET /post/{post_id}
async fn get_post_with_comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> ApiResult<Json<PostWithComments>> {
    let post = PostService::get_post_with_comments(&state.db, post_id).await?;
    Ok(Json(post))
}

/// List comments on a post
///
/// GET /post/{post_id}/comment
async fn get_comments_on_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    let comments = PostService::comments_on_post(&state.db, post_id).await?;
    Ok(Json(comments))
}

/// Comment on a post (requires authentication)
///
/// POST /comment
async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CommentIn>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = PostService::create_comment(&state.db, user.id, &req).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Like a post (requires authentication)
///
/// POST /like
async fn like_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<LikeIn>,
) -> ApiResult<(StatusCode, Json<PostLike>)> {
    let like = PostService::like_post(&state.db, user.id, &req).await?;
    Ok((StatusCode::CREATED, Json(like)))
}
