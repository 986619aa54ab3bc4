//! Post feed query engine.
//!
//! This module provides:
//! - FeedService: lists posts for a FeedQuery
//! - FeedQueryBuilder: SeaQuery-based SQL generation for the pipeline
//! - FeedStore: store capability, backed by PostgreSQL or memory
//! - Types: FeedQuery, SortMode, CommentJoin, PostSummary

mod feed_service;
mod memory;
mod query_builder;
mod store;
pub mod types;

pub use feed_service::FeedService;
pub use memory::MemoryFeedStore;
pub use query_builder::FeedQueryBuilder;
pub use store::{FeedStore, PgFeedStore};
pub use types::{CommentJoin, FeedQuery, PostSummary, SortMode, UnknownCommentJoin};
