//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

use crate::feed::CommentJoin;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 5000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Key used to correlate comments with posts when counting (default: title).
    pub feed_comment_join: CommentJoin,

    /// Statement timeout applied to each feed read, in seconds (default: 10).
    pub feed_statement_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let feed_comment_join = parse_comment_join(
            &env::var("FEED_COMMENT_JOIN").unwrap_or_else(|_| "title".to_string()),
        )?;

        let feed_statement_timeout_secs = env::var("FEED_STATEMENT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("FEED_STATEMENT_TIMEOUT_SECS must be a valid u64")?;

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            cors_allowed_origins,
            feed_comment_join,
            feed_statement_timeout_secs,
        })
    }
}

fn parse_comment_join(value: &str) -> Result<CommentJoin> {
    value
        .parse()
        .context("FEED_COMMENT_JOIN must be \"title\" or \"id\"")
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
