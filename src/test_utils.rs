//! Shared test utilities for `PocketLedger`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        auth::AuthService,
        expense::{self, NewExpense},
        saving_goal::{self, NewSavingGoal},
        user::{self, NewUser},
    },
    entities,
    errors::Result,
};
use chrono::{Duration, NaiveDate};
use sea_orm::DatabaseConnection;

/// Password given to every user created by [`create_test_user`]
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = crate::config::database::create_connection("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// An auth service with a fixed secret.
#[must_use]
pub fn test_auth() -> AuthService {
    AuthService::new(b"pocket-ledger-test-secret", Duration::minutes(30))
}

/// Shorthand for a calendar date in tests.
///
/// # Panics
/// Panics on an invalid date.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn test_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a test user with sensible defaults.
///
/// # Defaults
/// * `name`: "Test User"
/// * `password`: [`TEST_PASSWORD`]
/// * no date of birth, age, or gender
pub async fn create_test_user(
    db: &DatabaseConnection,
    auth: &AuthService,
    email: &str,
) -> Result<entities::user::Model> {
    user::create_user(
        db,
        auth,
        NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
            date_of_birth: None,
            age: None,
            gender: None,
        },
    )
    .await
}

/// Creates an expense dated `date` in the "misc" category.
pub async fn create_test_expense(
    db: &DatabaseConnection,
    user_id: i64,
    amount: f64,
    date: NaiveDate,
) -> Result<entities::expense::Model> {
    expense::create_expense(
        db,
        NewExpense {
            user_id,
            category: "misc".to_string(),
            amount,
            description: None,
            date: Some(date),
        },
    )
    .await
}

/// Creates a saving goal with a target of 1000.0.
pub async fn create_test_goal(
    db: &DatabaseConnection,
    user_id: i64,
    title: &str,
) -> Result<entities::saving_goal::Model> {
    saving_goal::create_saving_goal(
        db,
        NewSavingGoal {
            user_id,
            title: title.to_string(),
            target_amount: 1000.0,
        },
    )
    .await
}

/// Sets up a complete test environment with one user.
/// Returns (db, user) for common test scenarios.
pub async fn setup_with_user() -> Result<(DatabaseConnection, entities::user::Model)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, &test_auth(), "test@example.com").await?;
    Ok((db, user))
}
