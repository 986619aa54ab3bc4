//! Post model.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Post record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Post title. Comments reference it by value.
    pub title: String,

    /// Author email address.
    pub author_email: String,

    /// Free-form tag, searchable from the feed.
    pub tag: String,

    pub up_vote: i64,

    pub down_vote: i64,

    /// Creation time; never updated.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub title: String,
    pub author_email: String,
    #[serde(default)]
    pub tag: String,
    pub up_vote: Option<i64>,
    pub down_vote: Option<i64>,
}

impl Post {
    /// Create a new post.
    pub async fn create(pool: &PgPool, input: CreatePost) -> Result<Self> {
        let id = Uuid::now_v7();
        let now = Utc::now();

        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO post (id, title, author_email, tag, up_vote, down_vote, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, author_email, tag, up_vote, down_vote, created_at
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.author_email)
        .bind(&input.tag)
        .bind(input.up_vote.unwrap_or(0))
        .bind(input.down_vote.unwrap_or(0))
        .bind(now)
        .fetch_one(pool)
        .await
        .context("failed to create post")?;

        Ok(post)
    }

    /// Find a post by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, title, author_email, tag, up_vote, down_vote, created_at FROM post WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch post by id")?;

        Ok(post)
    }

    /// Delete a post.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM post WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete post")?;

        Ok(result.rows_affected() > 0)
    }
}
