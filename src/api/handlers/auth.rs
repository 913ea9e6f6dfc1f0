//! Registration, login, and password reset handlers

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{AppError, AppState, parse_body};
use crate::core::{
    auth::TOKEN_TYPE,
    user::{self, NewUser, UserResponse},
};
use crate::entities::user::Model as UserModel;
use crate::errors::Error;

/// Response to a successful register or login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub access_token: String,
    pub token_type: String,
    pub user: UserResponse,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Request body for logging in
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for confirming identity before a reset
#[derive(Debug, Deserialize)]
pub struct VerifyDetailsRequest {
    pub email: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
}

/// Request body for setting a new password; carries the same identity details
/// as [`VerifyDetailsRequest`]
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub new_password: String,
}

fn auth_response(
    state: &AppState,
    message: &str,
    user: UserModel,
) -> Result<Json<AuthResponse>, AppError> {
    let access_token = state.auth.issue_token(user.id, &user.email)?;
    Ok(Json(AuthResponse {
        message: message.to_string(),
        access_token,
        token_type: TOKEN_TYPE.to_string(),
        user: user.into(),
    }))
}

/// Unknown email and mismatched details get the same answer.
fn details_error(err: Error) -> AppError {
    match err {
        Error::InvalidCredentials | Error::UserNotFound { .. } => {
            AppError::not_found("User details do not match")
        }
        other => other.into(),
    }
}

/// POST /auth/register - Create an account and return a token
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AuthResponse>, AppError> {
    let req: NewUser = parse_body(&body)?;
    let user = user::create_user(&state.db, &state.auth, req).await?;
    auth_response(&state, "User registered successfully", user)
}

/// POST /auth/login - Exchange credentials for a token
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AuthResponse>, AppError> {
    let req: LoginRequest = parse_body(&body)?;
    let user = user::authenticate(&state.db, &state.auth, &req.email, &req.password).await?;
    auth_response(&state, "Login successful", user)
}

/// POST /auth/verify-details - Confirm name and date of birth for an email
pub async fn verify_details(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let req: VerifyDetailsRequest = parse_body(&body)?;
    user::verify_user_details(&state.db, &req.email, &req.name, req.date_of_birth)
        .await
        .map_err(details_error)?;
    Ok(MessageResponse::new("User details verified"))
}

/// POST /auth/reset-password - Set a new password after re-checking identity details
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let req: ResetPasswordRequest = parse_body(&body)?;
    user::reset_password(
        &state.db,
        &state.auth,
        &req.email,
        &req.name,
        req.date_of_birth,
        &req.new_password,
    )
    .await
    .map_err(details_error)?;
    Ok(MessageResponse::new("Password reset successfully"))
}
