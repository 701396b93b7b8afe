//! Identity HTTP handlers.
//!
//! This module implements the identity API endpoints:
//! - POST /api/auth/register - Create a new user
//! - POST /api/auth/login - Authenticate by email and password
//! - POST /api/auth/setAvatar/{id} - Set a user's avatar image
//! - GET /api/auth/allUsers/{id} - List every other user (paginated)

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::user::{ListUsersQuery, LoginRequest, RegisterRequest, SetAvatarRequest},
    services::user_service,
    state::AppState,
};

/// Register a new user.
///
/// # Response (201)
///
/// ```json
/// {
///   "success": true,
///   "message": "User created successfully",
///   "user": { "userId": "...", "name": "Alice", "email": "alice@example.com", ... }
/// }
/// ```
///
/// The returned user never carries the password digest.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = user_service::register(&state, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User created successfully",
            "user": user
        })),
    ))
}

/// Authenticate a user.
///
/// # Response (200)
///
/// ```json
/// {
///   "success": true,
///   "message": "Welcome back, Alice",
///   "user": { ... }
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = user_service::login(&state, request).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Welcome back, {}", user.name),
        "user": user
    })))
}

/// Set the avatar image for the user addressed by the path id.
pub async fn set_avatar(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<SetAvatarRequest>,
) -> Result<impl IntoResponse, AppError> {
    let update = user_service::set_avatar(&state, user_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "isSet": update.is_set,
        "image": update.image
    })))
}

/// List all users except the one in the path, projected to public fields.
///
/// Supports `?cursor=` and `?limit=` query parameters; the response carries
/// `nextCursor` when more pages remain.
pub async fn all_users(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (users, next_cursor) = user_service::list_users(&state, user_id, query).await?;

    Ok(Json(json!({
        "success": true,
        "users": users,
        "nextCursor": next_cursor
    })))
}
