//! Expense entity - A single recorded monetary outflow.
//!
//! Expenses are created on submission and never updated. The `date` column is a
//! calendar date; the analytics windows compare against it inclusively.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the user who owns this expense
    pub user_id: i64,
    /// Free-text category (e.g., "food", "travel")
    pub category: String,
    /// Amount spent, never negative
    pub amount: f64,
    /// Optional note
    pub description: Option<String>,
    /// Calendar date the money was spent
    pub date: Date,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one user
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
