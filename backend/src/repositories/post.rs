//! Post, comment, and like repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use social_media_shared::types::PostSorting;
use sqlx::PgPool;
use uuid::Uuid;

/// Post record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Post record joined with its like count
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostWithLikesRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub likes: i64,
}

/// Comment record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRecord {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Like record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LikeRecord {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

const SELECT_POST_WITH_LIKES: &str = r#"
    SELECT p.id, p.user_id, p.body, p.image_url, p.created_at,
           COUNT(l.id) AS likes
    FROM posts p
    LEFT JOIN likes l ON l.post_id = p.id
"#;

/// Post repository for database operations
pub struct PostRepository;

impl PostRepository {
    /// Create a new post
    pub async fn create(pool: &PgPool, user_id: Uuid, body: &str) -> Result<PostRecord> {
        let post = sqlx::query_as::<_, PostRecord>(
            r#"
            INSERT INTO posts (user_id, body)
            VALUES ($1, $2)
            RETURNING id, user_id, body, image_url, created_at
            "#,
        )
        .bind(user_id)
        .bind(body)
        .fetch_one(pool)
        .await?;

        Ok(post)
    }

    /// Find a post by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PostRecord>> {
        let post = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT id, user_id, body, image_url, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(post)
    }

    /// List all posts with their like counts, in the requested order
    pub async fn list_with_likes(
        pool: &PgPool,
        sorting: PostSorting,
    ) -> Result<Vec<PostWithLikesRecord>> {
        let order_by = match sorting {
            PostSorting::New => "p.created_at DESC",
            PostSorting::Old => "p.created_at ASC",
            PostSorting::MostLikes => "likes DESC",
        };
        let query = format!("{} GROUP BY p.id ORDER BY {}", SELECT_POST_WITH_LIKES, order_by);

        let posts = sqlx::query_as::<_, PostWithLikesRecord>(&query)
            .fetch_all(pool)
            .await?;

        Ok(posts)
    }

    /// Fetch a single post with its like count
    pub async fn find_with_likes(pool: &PgPool, id: Uuid) -> Result<Option<PostWithLikesRecord>> {
        let query = format!("{} WHERE p.id = $1 GROUP BY p.id", SELECT_POST_WITH_LIKES);

        let post = sqlx::query_as::<_, PostWithLikesRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(post)
    }

    /// Attach a generated image URL to a post
    pub async fn set_image_url(pool: &PgPool, id: Uuid, image_url: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE posts
            SET image_url = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(image_url)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Create a comment on a post
    pub async fn create_comment(
        pool: &PgPool,
        post_id: Uuid,
        user_id: Uuid,
        body: &str,
    ) -> Result<CommentRecord> {
        let comment = sqlx::query_as::<_, CommentRecord>(
            r#"
            INSERT INTO comments (post_id, user_id, body)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, user_id, body, created_at
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(body)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// List comments on a post, oldest first
    pub async fn comments_for_post(pool: &PgPool, post_id: Uuid) -> Result<Vec<CommentRecord>> {
        let comments = sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT id, post_id, user_id, body, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    /// Record a like on a post
    pub async fn create_like(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<LikeRecord> {
        let like = sqlx::query_as::<_, LikeRecord>(
            r#"
            INSERT INTO likes (post_id, user_id)
            VALUES ($1, $2)
            RETURNING id, post_id, user_id, created_at
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(like)
    }
}

impl From<PostRecord> for social_media_shared::types::Post {
    fn from(record: PostRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            body: record.body,
            image_url: record.image_url,
            created_at: record.created_at,
        }
    }
}

impl From<PostWithLikesRecord> for social_media_shared::types::PostWithLikes {
    fn from(record: PostWithLikesRecord) -> Self {
        Self {
            post: social_media_shared::types::Post {
                id: record.id,
                user_id: record.user_id,
                body: record.body,
                image_url: record.image_url,
                created_at: record.created_at,
            },
            likes: record.likes,
        }
    }
}

impl From<CommentRecord> for social_media_shared::types::Comment {
    fn from(record: CommentRecord) -> Self {
        Self {
            id: record.id,
            post_id: record.post_id,
            user_id: record.user_id,
            body: record.body,
            created_at: record.created_at,
        }
    }
}

impl From<LikeRecord> for social_media_shared::types::PostLike {
    fn from(record: LikeRecord) -> Self {
        Self {
            id: record.id,
            post_id: record.post_id,
            user_id: record.user_id,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    // Database-backed paths are covered by the integration tests in
    // tests/, which run with --features integration.
}
