//! Saving goal business logic.
//!
//! Goals start with nothing saved. [`update_saved_amount`] replaces the recorded
//! progress with the value the user reports; it never adds to the previous value.

use crate::{
    entities::{SavingGoal, User, saving_goal},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Maximum stored length of a goal title
pub const MAX_TITLE_LEN: usize = 100;

/// Input for creating a saving goal.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSavingGoal {
    /// Owner of the goal
    pub user_id: i64,
    /// Goal title
    pub title: String,
    /// Amount to reach
    pub target_amount: f64,
}

fn check_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Creates a goal for an existing user with `saved_amount` at zero.
#[instrument(skip(db, new_goal), fields(user_id = new_goal.user_id))]
pub async fn create_saving_goal(
    db: &DatabaseConnection,
    new_goal: NewSavingGoal,
) -> Result<saving_goal::Model> {
    check_amount(new_goal.target_amount)?;

    let title = new_goal.title.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
        return Err(Error::Validation {
            message: format!("title must be 1 to {MAX_TITLE_LEN} characters"),
        });
    }

    User::find_by_id(new_goal.user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            id: new_goal.user_id.to_string(),
        })?;

    let model = saving_goal::ActiveModel {
        title: Set(title.to_string()),
        target_amount: Set(new_goal.target_amount),
        saved_amount: Set(0.0),
        user_id: Set(new_goal.user_id),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!(
        "Created saving goal_id {} '{}' for user_id {} with target {:.2}",
        created.id, created.title, created.user_id, created.target_amount
    );
    Ok(created)
}

/// Returns a user's goals in creation order.
pub async fn get_goals_by_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<saving_goal::Model>> {
    SavingGoal::find()
        .filter(saving_goal::Column::UserId.eq(user_id))
        .order_by_asc(saving_goal::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sets a goal's saved amount to `saved_amount`.
///
/// The goal must belong to `user_id`; a goal owned by someone else is reported
/// exactly like a missing one.
#[instrument(skip(db))]
pub async fn update_saved_amount(
    db: &DatabaseConnection,
    goal_id: i64,
    user_id: i64,
    saved_amount: f64,
) -> Result<saving_goal::Model> {
    check_amount(saved_amount)?;

    let goal = SavingGoal::find_by_id(goal_id)
        .filter(saving_goal::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::GoalNotFound { id: goal_id })?;

    let mut active: saving_goal::ActiveModel = goal.into();
    active.saved_amount = Set(saved_amount);
    let updated = active.update(db).await?;

    info!(
        "Set saved amount of goal_id {} to {:.2}",
        goal_id, updated.saved_amount
    );
    Ok(updated)
}
