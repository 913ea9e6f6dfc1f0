//! Saving goal handlers

use std::sync::Arc;

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::{AppError, AppState, ensure_owner, parse_body};
use crate::core::auth::Claims;
use crate::core::saving_goal::{self, NewSavingGoal};
use crate::entities::saving_goal::Model as SavingGoalModel;

/// GET /goals/user/:user_id - List a user's goals
pub async fn list_user_goals(
    State(state): State<Arc<AppState>>,
    caller: Option<Extension<Claims>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<SavingGoalModel>>, AppError> {
    ensure_owner(caller.as_deref(), user_id)?;
    Ok(Json(saving_goal::get_goals_by_user(&state.db, user_id).await?))
}

/// POST /goals/ - Create a goal
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    caller: Option<Extension<Claims>>,
    body: Bytes,
) -> Result<Json<SavingGoalModel>, AppError> {
    let req: NewSavingGoal = parse_body(&body)?;
    ensure_owner(caller.as_deref(), req.user_id)?;
    Ok(Json(saving_goal::create_saving_goal(&state.db, req).await?))
}

/// Owner of the goal being updated
#[derive(Debug, Deserialize)]
pub struct GoalOwnerQuery {
    pub user_id: i64,
}

/// Request body for updating progress
#[derive(Debug, Deserialize)]
pub struct UpdateGoalRequest {
    pub saved_amount: f64,
}

/// PATCH /goals/:goal_id?user_id=N - Set the saved amount (replaces, never adds)
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    Path(goal_id): Path<i64>,
    caller: Option<Extension<Claims>>,
    Query(owner): Query<GoalOwnerQuery>,
    body: Bytes,
) -> Result<Json<SavingGoalModel>, AppError> {
    ensure_owner(caller.as_deref(), owner.user_id)?;
    let req: UpdateGoalRequest = parse_body(&body)?;
    let goal =
        saving_goal::update_saved_amount(&state.db, goal_id, owner.user_id, req.saved_amount)
            .await?;
    Ok(Json(goal))
}
