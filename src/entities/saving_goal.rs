//! Saving goal entity - A user-defined target with a manually set progress value.
//!
//! `saved_amount` is overwritten by updates, never accumulated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Saving goal database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "saving_goals")]
pub struct Model {
    /// Unique identifier for the goal
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable goal title (e.g., "Emergency fund")
    pub title: String,
    /// Amount the user wants to reach
    pub target_amount: f64,
    /// Progress recorded by the user, starts at 0
    pub saved_amount: f64,
    /// ID of the user who owns this goal
    pub user_id: i64,
}

/// Defines relationships between `SavingGoal` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each goal belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
