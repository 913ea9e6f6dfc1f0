//! User lookup and deletion handlers

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use super::auth::MessageResponse;
use crate::api::{AppError, AppState, ensure_owner};
use crate::core::auth::Claims;
use crate::core::user::{self, UserResponse};
use crate::errors::Error;

/// GET / - Liveness message
pub async fn root() -> Json<MessageResponse> {
    MessageResponse::new("Backend is running successfully!")
}

/// GET /users/ - List all users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = user::list_users(&state.db).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/:id - Get a specific user
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    caller: Option<Extension<Claims>>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    ensure_owner(caller.as_deref(), id)?;
    let user = user::get_user_by_id(&state.db, id)
        .await?
        .ok_or(Error::UserNotFound { id: id.to_string() })?;
    Ok(Json(user.into()))
}

/// DELETE /users/:id - Delete your own account and everything it owns
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    caller: Option<Extension<Claims>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    ensure_owner(caller.as_deref(), id)?;
    user::delete_user(&state.db, id).await?;
    Ok(MessageResponse::new("User deleted"))
}
