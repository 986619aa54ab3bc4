//! Post routes.
//!
//! The feed listing plus single-statement post operations.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::feed::{FeedQuery, PostSummary, SortMode};
use crate::models::{CreatePost, Post};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Feed query string.
///
/// `email` is accepted for `authorEmail`. Empty strings count as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedParams {
    #[serde(alias = "email")]
    pub author_email: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl FeedParams {
    /// Normalize into a FeedQuery.
    ///
    /// `page` below 1 becomes 1; `limit` below 1 disables pagination.
    pub fn into_query(self) -> FeedQuery {
        let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());

        let page = self
            .page
            .filter(|p| *p >= 1)
            .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
            .unwrap_or(1);

        let page_size = self
            .limit
            .filter(|l| *l >= 1)
            .map(|l| u32::try_from(l).unwrap_or(u32::MAX));

        FeedQuery {
            author_email: non_empty(self.author_email),
            search: non_empty(self.search),
            sort: self
                .sort
                .as_deref()
                .map(SortMode::parse_lenient)
                .unwrap_or_default(),
            page,
            page_size,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub author_email: Option<String>,
    pub tag: Option<String>,
    pub up_vote: Option<i64>,
    pub down_vote: Option<i64>,
}

impl CreatePostRequest {
    /// Validate into model input.
    pub fn validate(self) -> Result<CreatePost, AppError> {
        let title = self.title.filter(|t| !t.trim().is_empty());
        let author_email = self.author_email.filter(|e| !e.trim().is_empty());

        let (Some(title), Some(author_email)) = (title, author_email) else {
            return Err(AppError::BadRequest(
                "title and authorEmail are required".to_string(),
            ));
        };

        if self.up_vote.is_some_and(|v| v < 0) || self.down_vote.is_some_and(|v| v < 0) {
            return Err(AppError::BadRequest(
                "upVote and downVote must not be negative".to_string(),
            ));
        }

        Ok(CreatePost {
            title,
            author_email,
            tag: self.tag.unwrap_or_default(),
            up_vote: self.up_vote,
            down_vote: self.down_vote,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertedResponse {
    pub inserted_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// List the post feed.
///
/// GET /posts
async fn list_posts(
    State(state): State<AppState>,
    params: Result<Query<FeedParams>, QueryRejection>,
) -> AppResult<Json<Vec<PostSummary>>> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let query = params.into_query();

    let posts = state.feed().list_posts(&query).await?;
    Ok(Json(posts))
}

/// Count posts by an author.
///
/// GET /posts/count/{email}
async fn count_posts(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<CountResponse>> {
    let count = state.feed().count_by_author(&email).await?;
    Ok(Json(CountResponse { count }))
}

/// Create a post.
///
/// POST /posts
async fn create_post(
    State(state): State<AppState>,
    body: Result<Json<CreatePostRequest>, JsonRejection>,
) -> AppResult<Json<InsertedResponse>> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let input = request.validate()?;

    let post = Post::create(state.db(), input).await?;
    tracing::info!(post_id = %post.id, author = %post.author_email, "post created");

    Ok(Json(InsertedResponse {
        inserted_id: post.id,
    }))
}

/// Delete a post.
///
/// DELETE /post/{id}
async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    if !Post::delete(state.db(), id).await? {
        return Err(AppError::NotFound("Post"));
    }

    tracing::info!(post_id = %id, "post deleted");
    Ok(Json(MessageResponse {
        message: "Post deleted".to_string(),
    }))
}

/// Create the post router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/count/{email}", get(count_posts))
        .route("/post/{id}", delete(delete_post))
}
