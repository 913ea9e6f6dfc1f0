//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod expense;
pub mod saving_goal;
pub mod user;

// Re-export specific types to avoid conflicts
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use saving_goal::{
    Column as SavingGoalColumn, Entity as SavingGoal, Model as SavingGoalModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
