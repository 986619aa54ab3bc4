//! Comment model with moderation reports.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Comment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Parent post ID.
    pub post_id: Uuid,

    /// Parent post title, copied at creation. The feed counts comments by it.
    pub post_title: String,

    pub commenter_email: String,

    pub content: String,

    pub created_at: DateTime<Utc>,

    /// Flagged for moderation.
    pub reported: bool,

    /// Reporter's reason; only set once reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_at: Option<DateTime<Utc>>,
}

/// Input for creating a comment.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub post_id: Uuid,
    pub post_title: String,
    pub commenter_email: String,
    pub content: String,
}

const COLUMNS: &str =
    "id, post_id, post_title, commenter_email, content, created_at, reported, feedback, reported_at";

impl Comment {
    /// Create a new comment.
    pub async fn create(pool: &PgPool, input: CreateComment) -> Result<Self> {
        let id = Uuid::now_v7();
        let now = Utc::now();

        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            INSERT INTO comment (id, post_id, post_title, commenter_email, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(input.post_id)
        .bind(&input.post_title)
        .bind(&input.commenter_email)
        .bind(&input.content)
        .bind(now)
        .fetch_one(pool)
        .await
        .context("failed to create comment")?;

        Ok(comment)
    }

    /// Flag a comment for moderation.
    ///
    /// Reporting again replaces the feedback and timestamp.
    pub async fn report(pool: &PgPool, id: Uuid, feedback: &str) -> Result<Option<Self>> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            UPDATE comment
            SET reported = TRUE, feedback = $1, reported_at = $2
            WHERE id = $3
            RETURNING {COLUMNS}
            "#
        ))
        .bind(feedback)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to report comment")?;

        Ok(comment)
    }

    /// List reported comments, most recently reported first.
    pub async fn list_reported(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM comment
            WHERE reported
            ORDER BY reported_at DESC, id ASC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("failed to list reported comments")?;

        Ok(comments)
    }
}
