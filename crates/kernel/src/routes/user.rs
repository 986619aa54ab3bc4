//! User routes.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{Badge, CreateUser, User};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Public profile.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub image: String,
    pub badge: Badge,
    pub registered_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        let badge = user.badge();
        Self {
            name: user.name,
            email: user.email,
            image: user.photo_url,
            badge,
            registered_at: user.created_at,
        }
    }
}

/// Register a user. Existing emails are left untouched.
///
/// POST /user
async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreateUserResponse>)> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let name = request.name.filter(|n| !n.trim().is_empty());
    let email = request.email.filter(|e| !e.trim().is_empty());
    let (Some(name), Some(email)) = (name, email) else {
        return Err(AppError::BadRequest(
            "Name and email are required".to_string(),
        ));
    };

    let created = User::create(
        state.db(),
        CreateUser {
            name,
            email,
            photo_url: request.photo_url,
        },
    )
    .await?;

    let Some(user) = created else {
        return Ok((
            StatusCode::OK,
            Json(CreateUserResponse {
                message: "User already exists",
                user: None,
            }),
        ));
    };

    tracing::info!(user_id = %user.id, "user created");
    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User created",
            user: Some(user),
        }),
    ))
}

/// Fetch a profile by email.
///
/// GET /user/{email}
async fn get_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<UserProfile>> {
    let user = User::find_by_email(state.db(), &email)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(Json(user.into()))
}

/// Create the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user", post(create_user))
        .route("/user/{email}", get(get_user))
}
