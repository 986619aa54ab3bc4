//! DiscoZone test utilities.
//!
//! Fixture builders for posts and comments, a fixed clock for
//! deterministic timestamps, and JSON assertion helpers.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Fixed reference instant (2024-01-01T00:00:00Z) for fixtures.
pub fn base_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default()
}

/// `base_time()` plus `minutes`.
pub fn minutes_after_base(minutes: i64) -> DateTime<Utc> {
    base_time() + Duration::minutes(minutes)
}

/// Create a test post with default values.
pub fn test_post(title: &str) -> TestPost {
    TestPost {
        id: Uuid::now_v7(),
        title: title.to_string(),
        author_email: "author@example.com".to_string(),
        tag: String::new(),
        up_vote: 0,
        down_vote: 0,
        created_at: base_time(),
    }
}

/// A test post builder.
#[derive(Debug, Clone)]
pub struct TestPost {
    pub id: Uuid,
    pub title: String,
    pub author_email: String,
    pub tag: String,
    pub up_vote: i64,
    pub down_vote: i64,
    pub created_at: DateTime<Utc>,
}

impl TestPost {
    /// Set a custom ID.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Set the author.
    pub fn by(mut self, email: &str) -> Self {
        self.author_email = email.to_string();
        self
    }

    /// Set the tag.
    pub fn tagged(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }

    /// Set vote counts.
    pub fn with_votes(mut self, up: i64, down: i64) -> Self {
        self.up_vote = up;
        self.down_vote = down;
        self
    }

    /// Set creation time to `minutes` after the base time.
    pub fn created_at_minute(mut self, minutes: i64) -> Self {
        self.created_at = minutes_after_base(minutes);
        self
    }

    /// Build a comment pointing at this post by both id and title.
    pub fn comment(&self) -> TestComment {
        test_comment(self.id, &self.title)
    }
}

/// Create a test comment referencing a post.
pub fn test_comment(post_id: Uuid, post_title: &str) -> TestComment {
    TestComment {
        id: Uuid::now_v7(),
        post_id,
        post_title: post_title.to_string(),
        commenter_email: "reader@example.com".to_string(),
        content: "Nice post".to_string(),
        created_at: base_time(),
        feedback: None,
    }
}

/// A test comment builder.
#[derive(Debug, Clone)]
pub struct TestComment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub post_title: String,
    pub commenter_email: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub feedback: Option<String>,
}

impl TestComment {
    /// Set the commenter.
    pub fn by(mut self, email: &str) -> Self {
        self.commenter_email = email.to_string();
        self
    }

    /// Set the body.
    pub fn saying(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    /// Override the referenced title, leaving `post_id` alone.
    pub fn with_post_title(mut self, title: &str) -> Self {
        self.post_title = title.to_string();
        self
    }

    /// Mark as reported with the given feedback.
    pub fn reported(mut self, feedback: &str) -> Self {
        self.feedback = Some(feedback.to_string());
        self
    }

    /// Whether the comment is flagged.
    pub fn is_reported(&self) -> bool {
        self.feedback.is_some()
    }
}

/// Assertion helpers for JSON content.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a JSON value lacks a specific key.
    pub fn lacks_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_none(),
            "Expected JSON to NOT have key '{key}', got: {value}"
        );
    }

    /// Collect a string field from every element of a JSON array.
    pub fn string_field(array: &Value, key: &str) -> Vec<String> {
        array
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get(key).and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Assert that a sequence never increases.
    pub fn non_increasing<T: PartialOrd + std::fmt::Debug>(values: &[T]) {
        for pair in values.windows(2) {
            assert!(
                pair[0] >= pair[1],
                "Expected non-increasing sequence, got: {values:?}"
            );
        }
    }
}
