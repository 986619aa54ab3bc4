//! In-process feed store.
//!
//! Evaluates the feed pipeline over posts and comments held in memory, stage
//! by stage: filter, count comments, derive vote difference, stable sort,
//! then page. Posts are kept in insertion order, which is the tie order.

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use regex::{Regex, RegexBuilder};

use super::store::FeedStore;
use super::types::{CommentJoin, FeedQuery, PostSummary, SortMode};
use crate::models::{Comment, Post};

#[derive(Default)]
struct MemoryData {
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

/// Feed store over in-memory collections.
#[derive(Default)]
pub struct MemoryFeedStore {
    join: CommentJoin,
    data: RwLock<MemoryData>,
}

impl MemoryFeedStore {
    /// Create an empty store.
    pub fn new(join: CommentJoin) -> Self {
        Self {
            join,
            data: RwLock::new(MemoryData::default()),
        }
    }

    /// Create a store holding the given posts and comments.
    pub fn with_data(join: CommentJoin, posts: Vec<Post>, comments: Vec<Comment>) -> Self {
        Self {
            join,
            data: RwLock::new(MemoryData { posts, comments }),
        }
    }

    /// Append a post.
    pub fn insert_post(&self, post: Post) {
        self.data.write().posts.push(post);
    }

    /// Append a comment.
    pub fn insert_comment(&self, comment: Comment) {
        self.data.write().comments.push(comment);
    }

    fn matching_posts<'a>(
        posts: &'a [Post],
        query: &FeedQuery,
    ) -> Result<impl Iterator<Item = &'a Post>> {
        let author = query.author_filter().map(str::to_owned);
        let search = query.search_term().map(tag_matcher).transpose()?;

        Ok(posts.iter().filter(move |post| {
            author
                .as_deref()
                .is_none_or(|email| post.author_email == email)
                && search.as_ref().is_none_or(|re| re.is_match(&post.tag))
        }))
    }

    fn comment_counts(&self, comments: &[Comment]) -> HashMap<String, i64> {
        let mut counts = HashMap::new();
        for comment in comments {
            let key = match self.join {
                CommentJoin::Title => comment.post_title.clone(),
                CommentJoin::Id => comment.post_id.to_string(),
            };
            *counts.entry(key).or_insert(0) += 1;
        }
        counts
    }

    fn post_key(&self, post: &Post) -> String {
        match self.join {
            CommentJoin::Title => post.title.clone(),
            CommentJoin::Id => post.id.to_string(),
        }
    }
}

/// Case-insensitive, unanchored literal match on the tag.
fn tag_matcher(term: &str) -> Result<Regex> {
    RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
        .context("invalid search term")
}

#[async_trait]
impl FeedStore for MemoryFeedStore {
    async fn list_posts(&self, query: &FeedQuery) -> Result<Vec<PostSummary>> {
        let data = self.data.read();

        let counts = self.comment_counts(&data.comments);
        let mut rows: Vec<PostSummary> = Self::matching_posts(&data.posts, query)?
            .map(|post| {
                let count = counts.get(&self.post_key(post)).copied().unwrap_or(0);
                PostSummary::from_post(post, count)
            })
            .collect();

        // `sort_by` is stable: equal keys keep insertion order
        match query.sort {
            SortMode::Popular => rows.sort_by(|a, b| b.vote_difference.cmp(&a.vote_difference)),
            SortMode::New => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }

        let Some((offset, limit)) = query.pagination() else {
            return Ok(rows);
        };

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_posts(&self, query: &FeedQuery) -> Result<i64> {
        let data = self.data.read();
        let count = Self::matching_posts(&data.posts, query)?.count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}
