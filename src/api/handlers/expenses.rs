//! Expense and spending analysis handlers

use std::sync::Arc;

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::{AppError, AppState, ensure_owner, parse_body};
use crate::core::{
    analysis::{AnalysisResult, ExpenseAnalyzer},
    auth::Claims,
    expense::{self, NewExpense},
    user,
};
use crate::entities::expense::Model as ExpenseModel;
use crate::errors::Error;

/// GET /expenses/ - List every expense
pub async fn list_all_expenses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ExpenseModel>>, AppError> {
    Ok(Json(expense::get_all_expenses(&state.db).await?))
}

/// GET /expenses/:user_id - List a user's expenses, newest first
///
/// An unknown user gets an empty list rather than a 404.
pub async fn list_user_expenses(
    State(state): State<Arc<AppState>>,
    caller: Option<Extension<Claims>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<ExpenseModel>>, AppError> {
    ensure_owner(caller.as_deref(), user_id)?;
    Ok(Json(expense::get_expenses_by_user(&state.db, user_id).await?))
}

/// POST /expenses/ - Record an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    caller: Option<Extension<Claims>>,
    body: Bytes,
) -> Result<Json<ExpenseModel>, AppError> {
    let req: NewExpense = parse_body(&body)?;
    ensure_owner(caller.as_deref(), req.user_id)?;
    Ok(Json(expense::create_expense(&state.db, req).await?))
}

/// Query parameters for the analysis endpoint
#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    /// Reference date; defaults to today
    pub date: Option<NaiveDate>,
}

/// GET /expenses/analysis/:user_id - Weekly and monthly spending comparison
pub async fn analyze_expenses(
    State(state): State<Arc<AppState>>,
    caller: Option<Extension<Claims>>,
    Path(user_id): Path<i64>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<AnalysisResult>, AppError> {
    ensure_owner(caller.as_deref(), user_id)?;
    if user::get_user_by_id(&state.db, user_id).await?.is_none() {
        return Err(Error::UserNotFound {
            id: user_id.to_string(),
        }
        .into());
    }

    let analyzer = ExpenseAnalyzer::new(&state.db);
    let result = match query.date {
        Some(reference) => analyzer.analyze(user_id, reference).await?,
        None => analyzer.analyze_today(user_id).await?,
    };
    Ok(Json(result))
}
