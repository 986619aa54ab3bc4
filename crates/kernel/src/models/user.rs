//! User model.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// Email address (unique).
    pub email: String,

    /// Avatar URL; empty when none was given.
    #[serde(rename = "photoURL")]
    pub photo_url: String,

    /// Paid membership flag.
    pub is_member: bool,

    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub photo_url: Option<String>,
}

/// Profile badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Gold,
    Bronze,
}

impl User {
    /// Members get gold, everyone else bronze.
    pub fn badge(&self) -> Badge {
        if self.is_member {
            Badge::Gold
        } else {
            Badge::Bronze
        }
    }

    /// Find a user by email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, photo_url, is_member, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("failed to fetch user by email")?;

        Ok(user)
    }

    /// Create a user.
    ///
    /// Returns `None` when the email is already registered.
    pub async fn create(pool: &PgPool, input: CreateUser) -> Result<Option<Self>> {
        let id = Uuid::now_v7();
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, photo_url, is_member, created_at)
            VALUES ($1, $2, $3, $4, FALSE, $5)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, name, email, photo_url, is_member, created_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(input.photo_url.unwrap_or_default())
        .bind(now)
        .fetch_optional(pool)
        .await
        .context("failed to create user")?;

        Ok(user)
    }
}
