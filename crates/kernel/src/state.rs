//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::feed::{FeedService, FeedStore, PgFeedStore};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL connection pool.
    db: PgPool,

    /// Feed service.
    feed: Arc<FeedService>,
}

impl AppState {
    /// Create application state: connect, migrate, and wire the feed store.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        db::run_migrations(&db)
            .await
            .context("failed to run migrations")?;

        info!(
            comment_join = %config.feed_comment_join,
            statement_timeout_secs = config.feed_statement_timeout_secs,
            "feed store configured"
        );

        let store = Arc::new(PgFeedStore::new(
            db.clone(),
            config.feed_comment_join,
            config.feed_statement_timeout_secs,
        ));

        Ok(Self::with_feed_store(db, store))
    }

    /// Create application state over an existing pool and feed store.
    pub fn with_feed_store(db: PgPool, store: Arc<dyn FeedStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db,
                feed: FeedService::new(store),
            }),
        }
    }

    /// Get the database pool.
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get the feed service.
    pub fn feed(&self) -> &Arc<FeedService> {
        &self.inner.feed
    }

    /// Check if PostgreSQL is healthy.
    pub async fn postgres_healthy(&self) -> bool {
        db::check_health(&self.inner.db).await
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.inner.db.close().await;
    }
}
