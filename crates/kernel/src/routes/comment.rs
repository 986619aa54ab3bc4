//! Comment routes.
//!
//! Creating comments and the moderation report queue.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Comment, CreateComment, Post};
use crate::routes::post::InsertedResponse;
use crate::state::AppState;

/// Largest moderation page served at once.
const MAX_REPORTED_PER_PAGE: i64 = 100;

// =============================================================================
// Request Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    pub commenter_email: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportCommentRequest {
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReportedQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListReportedQuery {
    /// `(limit, offset)` with page clamped to 1 and size to 1..=100.
    fn window(&self) -> (i64, i64) {
        let per_page = self
            .per_page
            .unwrap_or(20)
            .clamp(1, MAX_REPORTED_PER_PAGE);
        let page = self.page.unwrap_or(1).max(1);
        (per_page, (page - 1).saturating_mul(per_page))
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a comment on a post.
///
/// POST /comments
async fn create_comment(
    State(state): State<AppState>,
    body: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<InsertedResponse>)> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    if request.commenter_email.trim().is_empty() || request.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "commenterEmail and content are required".to_string(),
        ));
    }

    let post = Post::find_by_id(state.db(), request.post_id)
        .await?
        .ok_or(AppError::NotFound("Post"))?;

    // The title is copied from the post so both references agree
    let comment = Comment::create(
        state.db(),
        CreateComment {
            post_id: post.id,
            post_title: post.title,
            commenter_email: request.commenter_email,
            content: request.content,
        },
    )
    .await?;

    tracing::info!(comment_id = %comment.id, post_id = %comment.post_id, "comment created");

    Ok((
        StatusCode::CREATED,
        Json(InsertedResponse {
            inserted_id: comment.id,
        }),
    ))
}

/// Report a comment for moderation.
///
/// PATCH /comments/{id}/report
async fn report_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<ReportCommentRequest>, JsonRejection>,
) -> AppResult<Json<Comment>> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let feedback = request.feedback.trim();
    if feedback.is_empty() {
        return Err(AppError::BadRequest("feedback is required".to_string()));
    }

    let comment = Comment::report(state.db(), id, feedback)
        .await?
        .ok_or(AppError::NotFound("Comment"))?;

    tracing::info!(comment_id = %id, "comment reported");
    Ok(Json(comment))
}

/// List reported comments.
///
/// GET /comments/reported
async fn list_reported(
    State(state): State<AppState>,
    query: Result<Query<ListReportedQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Comment>>> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let (limit, offset) = query.window();

    let comments = Comment::list_reported(state.db(), limit, offset).await?;
    Ok(Json(comments))
}

/// Create the comment router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/comments", post(create_comment))
        .route("/comments/reported", get(list_reported))
        .route("/comments/{id}/report", patch(report_comment))
}
