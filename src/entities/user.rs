//! User entity - Represents a registered account.
//!
//! Each user owns zero or more expenses and saving goals. Deleting a user
//! cascades to both. The `password` column holds an Argon2id PHC string, never
//! the plain credential, so the model is deliberately not `Serialize`.

use sea_orm::entity::prelude::*;

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login email, unique across all users
    #[sea_orm(unique)]
    pub email: String,
    /// Hashed password credential
    pub password: String,
    /// Optional date of birth, also used to verify identity for password resets
    pub date_of_birth: Option<Date>,
    /// Optional self-reported age
    pub age: Option<i32>,
    /// Optional self-reported gender
    pub gender: Option<String>,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
    /// One user has many saving goals
    #[sea_orm(has_many = "super::saving_goal::Entity")]
    SavingGoals,
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::saving_goal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SavingGoals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
