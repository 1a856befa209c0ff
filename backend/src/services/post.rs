//! Post service: posts, comments, likes, and image generation

use crate::clients::{EmailClient, ImageClient};
use crate::error::ApiError;
use crate::repositories::PostRepository;
use social_media_shared::types::{
    Comment, CommentIn, LikeIn, Post, PostLike, PostSorting, PostWithComments, PostWithLikes,
};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

/// Post service for content operations
pub struct PostService;

impl PostService {
    /// Create a new post for the given user
    pub async fn create_post(pool: &PgPool, user_id: Uuid, body: &str) -> Result<Post, ApiError> {
        if body.trim().is_empty() {
            return Err(ApiError::Validation("Post body must not be empty".to_string()));
        }

        let post = PostRepository::create(pool, user_id, body)
            .await
            .map_err(ApiError::Internal)?;

        info!("Created post {}", post.id);
        Ok(post.into())
    }

    /// List all posts with like counts in the requested order
    pub async fn list_posts(
        pool: &PgPool,
        sorting: PostSorting,
    ) -> Result<Vec<PostWithLikes>, ApiError> {
        let posts = PostRepository::list_with_likes(pool, sorting)
            .await
            .map_err(ApiError::Internal)?;

        Ok(posts.into_iter().map(Into::into).collect())
    }

    /// Fetch a post with its like count and comments
    pub async fn get_post_with_comments(
        pool: &PgPool,
        post_id: Uuid,
    ) -> Result<PostWithComments, ApiError> {
        let post = PostRepository::find_with_likes(pool, post_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

        let comments = PostRepository::comments_for_post(pool, post_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(PostWithComments {
            post: post.into(),
            comments: comments.into_iter().map(Into::into).collect(),
        })
    }

    /// Comment on an existing post
    pub async fn create_comment(
        pool: &PgPool,
        user_id: Uuid,
        comment: &CommentIn,
    ) -> Result<Comment, ApiError> {
        if PostRepository::find_by_id(pool, comment.post_id)
            .await
            .map_err(ApiError::Internal)?
            .is_none()
        {
            return Err(ApiError::NotFound("Post not found".to_string()));
        }

        let comment = PostRepository::create_comment(pool, comment.post_id, user_id, &comment.body)
            .await
            .map_err(ApiError::Internal)?;

        Ok(comment.into())
    }

    /// List comments on a post
    pub async fn comments_on_post(pool: &PgPool, post_id: Uuid) -> Result<Vec<Comment>, ApiError> {
        let comments = PostRepository::comments_for_post(pool, post_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(comments.into_iter().map(Into::into).collect())
    }

    /// Like an existing post
    pub async fn like_post(
        pool: &PgPool,
        user_id: Uuid,
        like: &LikeIn,
    ) -> Result<PostLike, ApiError> {
        if PostRepository::find_by_id(pool, like.post_id)
            .await
            .map_err(ApiError::Internal)?
            .is_none()
        {
            return Err(ApiError::NotFound("Post not found".to_string()));
        }

        let like = PostRepository::create_like(pool, like.post_id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(like.into())
    }

    /// Generate an image for a post and attach it (background task)
    ///
    /// On generation failure the post's author gets an email instead of
    /// the request failing; the post simply stays imageless.
    pub async fn generate_and_attach_image(
        pool: PgPool,
        images: ImageClient,
        mailer: EmailClient,
        author_email: String,
        post_id: Uuid,
        prompt: String,
    ) {
        let image_url = match images.generate_image(&prompt).await {
            Ok(url) => url,
            Err(e) => {
                error!("Image generation for post {} failed: {}", post_id, e);
                if let Err(mail_err) = mailer
                    .send_simple_email(
                        &author_email,
                        "Error in generating image",
                        &format!(
                            "Hi {}!\nAn error occurred while generating image: {}",
                            author_email, e
                        ),
                    )
                    .await
                {
                    error!("Failed to send image-failure email: {}", mail_err);
                }
                return;
            }
        };

        if let Err(e) = PostRepository::set_image_url(&pool, post_id, &image_url).await {
            error!("Failed to attach image to post {}: {}", post_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    // Database-backed paths are covered by the integration tests in
    // tests/; the outbound clients are unit-tested with wiremock in the
    // clients module.
}
