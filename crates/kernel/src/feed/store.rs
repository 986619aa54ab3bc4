//! Feed storage backends.
//!
//! `FeedStore` is the read capability the feed engine needs from the
//! document store. `PgFeedStore` renders the pipeline to SQL and runs it in a
//! single read-only transaction.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use super::query_builder::FeedQueryBuilder;
use super::types::{CommentJoin, FeedQuery, PostSummary};

/// Read access to posts and their comment counts.
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Run the full feed pipeline for one listing.
    async fn list_posts(&self, query: &FeedQuery) -> Result<Vec<PostSummary>>;

    /// Count posts matching the listing's filters (sort and paging ignored).
    async fn count_posts(&self, query: &FeedQuery) -> Result<i64>;
}

/// PostgreSQL-backed feed store.
pub struct PgFeedStore {
    pool: PgPool,
    join: CommentJoin,
    statement_timeout_secs: u64,
}

impl PgFeedStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool, join: CommentJoin, statement_timeout_secs: u64) -> Self {
        Self {
            pool,
            join,
            statement_timeout_secs,
        }
    }

    async fn begin_read(&self) -> Result<sqlx::Transaction<'_, sqlx::Postgres>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;

        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await
            .context("failed to mark transaction read-only")?;

        let timeout = format!(
            "SET LOCAL statement_timeout = '{}s'",
            self.statement_timeout_secs
        );
        sqlx::query(&timeout)
            .execute(&mut *tx)
            .await
            .context("failed to set statement timeout")?;

        Ok(tx)
    }
}

#[async_trait]
impl FeedStore for PgFeedStore {
    async fn list_posts(&self, query: &FeedQuery) -> Result<Vec<PostSummary>> {
        let sql = FeedQueryBuilder::new(query.clone(), self.join).build();
        tracing::trace!(%sql, "feed query");

        let mut tx = self.begin_read().await?;

        let rows = sqlx::query_as::<_, PostSummary>(&sql)
            .fetch_all(&mut *tx)
            .await
            .context("failed to execute feed query")?;

        tx.commit()
            .await
            .context("failed to commit feed transaction")?;

        Ok(rows)
    }

    async fn count_posts(&self, query: &FeedQuery) -> Result<i64> {
        let sql = FeedQueryBuilder::new(query.clone(), self.join).build_count();

        let mut tx = self.begin_read().await?;

        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&mut *tx)
            .await
            .context("failed to execute count query")?;

        tx.commit()
            .await
            .context("failed to commit count transaction")?;

        Ok(count)
    }
}
