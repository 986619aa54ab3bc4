//! Post feed types.
//!
//! - FeedQuery: listing parameters (author, search, sort, pagination)
//! - SortMode: feed ordering
//! - CommentJoin: key correlating comments with their post
//! - PostSummary: typed feed row with derived fields

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Post;

/// Feed ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Newest first (`created_at` descending).
    #[default]
    New,
    /// Highest vote difference first.
    Popular,
}

impl SortMode {
    /// Parse a sort parameter. Unknown values fall back to `New`.
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("popular") {
            SortMode::Popular
        } else {
            SortMode::New
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::New => f.write_str("new"),
            SortMode::Popular => f.write_str("popular"),
        }
    }
}

/// Key used to count comments per post.
///
/// `Title` matches `comment.post_title` against `post.title`; posts sharing a
/// title share their comment count. `Id` matches `comment.post_id` against
/// `post.id` and does not have that problem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentJoin {
    #[default]
    Title,
    Id,
}

/// Error parsing a [`CommentJoin`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown comment join key: {0}")]
pub struct UnknownCommentJoin(pub String);

impl FromStr for CommentJoin {
    type Err = UnknownCommentJoin;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(CommentJoin::Title),
            "id" => Ok(CommentJoin::Id),
            other => Err(UnknownCommentJoin(other.to_string())),
        }
    }
}

impl fmt::Display for CommentJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentJoin::Title => f.write_str("title"),
            CommentJoin::Id => f.write_str("id"),
        }
    }
}

/// Largest offset a listing may render (`i64::MAX`).
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Feed listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    /// Exact match on `author_email`.
    pub author_email: Option<String>,

    /// Case-insensitive substring match on `tag`. Matched literally: regex
    /// and LIKE metacharacters have no special meaning.
    pub search: Option<String>,

    /// Ordering.
    pub sort: SortMode,

    /// 1-based page number. Only meaningful with `page_size`.
    pub page: u32,

    /// Page size. `None` returns every matching post.
    pub page_size: Option<u32>,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            author_email: None,
            search: None,
            sort: SortMode::New,
            page: 1,
            page_size: None,
        }
    }
}

impl FeedQuery {
    /// All posts by one author, unpaginated.
    pub fn by_author(email: impl Into<String>) -> Self {
        Self {
            author_email: Some(email.into()),
            ..Default::default()
        }
    }

    /// Author filter, if set and non-empty.
    pub fn author_filter(&self) -> Option<&str> {
        self.author_email.as_deref().filter(|s| !s.is_empty())
    }

    /// Search term, if set and non-empty.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    /// `(offset, limit)` when paginated.
    ///
    /// The offset saturates at `i64::MAX`, the largest PostgreSQL accepts;
    /// such a page is past the end of any feed and comes back empty.
    pub fn pagination(&self) -> Option<(u64, u64)> {
        self.page_size.map(|size| {
            let size = u64::from(size);
            let offset = u64::from(self.page.saturating_sub(1))
                .saturating_mul(size)
                .min(MAX_OFFSET);
            (offset, size)
        })
    }
}

/// One feed row: stored post fields plus derived counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub author_email: String,
    pub tag: String,
    pub up_vote: i64,
    pub down_vote: i64,
    pub created_at: DateTime<Utc>,

    /// Number of comments joined to this post.
    pub comment_count: i64,

    /// `up_vote - down_vote`.
    pub vote_difference: i64,
}

impl PostSummary {
    /// Build a summary from a stored post and its comment count.
    pub fn from_post(post: &Post, comment_count: i64) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            author_email: post.author_email.clone(),
            tag: post.tag.clone(),
            up_vote: post.up_vote,
            down_vote: post.down_vote,
            created_at: post.created_at,
            comment_count,
            vote_difference: post.up_vote - post.down_vote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_mode_falls_back_to_new() {
        assert_eq!(SortMode::parse_lenient("popular"), SortMode::Popular);
        assert_eq!(SortMode::parse_lenient("POPULAR"), SortMode::Popular);
        assert_eq!(SortMode::parse_lenient("new"), SortMode::New);
        assert_eq!(SortMode::parse_lenient("-createdAt"), SortMode::New);
        assert_eq!(SortMode::parse_lenient(""), SortMode::New);
    }

    #[test]
    fn comment_join_parsing() {
        assert_eq!("title".parse::<CommentJoin>(), Ok(CommentJoin::Title));
        assert_eq!(" ID ".parse::<CommentJoin>(), Ok(CommentJoin::Id));
        assert_eq!(
            "slug".parse::<CommentJoin>(),
            Err(UnknownCommentJoin("slug".to_string()))
        );
        assert_eq!(CommentJoin::default(), CommentJoin::Title);
    }

    #[test]
    fn pagination_window() {
        let query = FeedQuery {
            page: 3,
            page_size: Some(10),
            ..Default::default()
        };
        assert_eq!(query.pagination(), Some((20, 10)));

        let first = FeedQuery {
            page: 0,
            page_size: Some(5),
            ..Default::default()
        };
        assert_eq!(first.pagination(), Some((0, 5)));

        assert_eq!(FeedQuery::default().pagination(), None);
    }

    #[test]
    fn pagination_offset_saturates_at_bigint_max() {
        let query = FeedQuery {
            page: u32::MAX,
            page_size: Some(u32::MAX),
            ..Default::default()
        };
        let (offset, limit) = query.pagination().unwrap();
        assert_eq!(offset, i64::MAX as u64);
        assert_eq!(limit, u64::from(u32::MAX));
    }

    #[test]
    fn empty_filters_are_ignored() {
        let query = FeedQuery {
            author_email: Some(String::new()),
            search: Some(String::new()),
            ..Default::default()
        };
        assert!(query.author_filter().is_none());
        assert!(query.search_term().is_none());
    }

    #[test]
    fn summary_serializes_camel_case() {
        let summary = PostSummary {
            id: Uuid::nil(),
            title: "A".to_string(),
            author_email: "x@x.com".to_string(),
            tag: "rock".to_string(),
            up_vote: 1,
            down_vote: 3,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            comment_count: 0,
            vote_difference: -2,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["authorEmail"], "x@x.com");
        assert_eq!(json["commentCount"], 0);
        assert_eq!(json["voteDifference"], -2);
        assert!(json.get("comments").is_none());
    }
}
