//! Feed service.
//!
//! Entry point for post listings. Delegates the pipeline to a `FeedStore`
//! and keeps no state between calls.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use super::store::FeedStore;
use super::types::{FeedQuery, PostSummary};

/// Service for listing the post feed.
pub struct FeedService {
    store: Arc<dyn FeedStore>,
}

impl FeedService {
    /// Create a new FeedService.
    pub fn new(store: Arc<dyn FeedStore>) -> Arc<Self> {
        Arc::new(Self { store })
    }

    /// List posts with comment counts and vote differences.
    ///
    /// All-or-nothing: a store failure yields an error, never a partial list.
    pub async fn list_posts(&self, query: &FeedQuery) -> Result<Vec<PostSummary>> {
        debug!(
            author = query.author_filter(),
            search = query.search_term(),
            sort = %query.sort,
            page = query.page,
            page_size = query.page_size,
            "listing feed"
        );

        let posts = self.store.list_posts(query).await?;

        debug!(returned = posts.len(), "feed listed");
        Ok(posts)
    }

    /// Count posts written by `email`.
    pub async fn count_by_author(&self, email: &str) -> Result<i64> {
        self.store.count_posts(&FeedQuery::by_author(email)).await
    }
}
