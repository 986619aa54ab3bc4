//! HTTP route handlers.

use axum::Router;

use crate::state::AppState;

pub mod comment;
pub mod health;
pub mod post;
pub mod user;

/// All API routes, without middleware layers.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(post::router())
        .merge(comment::router())
        .merge(user::router())
}
