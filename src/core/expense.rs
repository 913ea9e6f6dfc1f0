//! Expense business logic - recording and listing expenses.
//!
//! Expenses are append-only: created on submission, removed only when their owner
//! is deleted. This module also provides the database-backed [`ExpenseStore`] used
//! by the analyzer.

use crate::{
    core::analysis::ExpenseStore,
    entities::{Expense, User, expense},
    errors::{Error, Result},
};
use chrono::{Local, NaiveDate};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Maximum stored length of an expense category
pub const MAX_CATEGORY_LEN: usize = 50;

/// Input for recording an expense.
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    /// Owner of the expense
    pub user_id: i64,
    /// Free-text category
    pub category: String,
    /// Amount spent; must be finite and non-negative
    pub amount: f64,
    /// Optional note
    #[serde(default)]
    pub description: Option<String>,
    /// Day the money was spent; defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Records an expense for an existing user.
///
/// The category is trimmed and must be non-blank; a blank description is stored
/// as absent.
#[instrument(skip(db, new_expense), fields(user_id = new_expense.user_id))]
pub async fn create_expense(
    db: &DatabaseConnection,
    new_expense: NewExpense,
) -> Result<expense::Model> {
    let amount = new_expense.amount;
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    let category = new_expense.category.trim();
    if category.is_empty() || category.chars().count() > MAX_CATEGORY_LEN {
        return Err(Error::Validation {
            message: format!("category must be 1 to {MAX_CATEGORY_LEN} characters"),
        });
    }

    User::find_by_id(new_expense.user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            id: new_expense.user_id.to_string(),
        })?;

    let description = new_expense
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    let date = new_expense
        .date
        .unwrap_or_else(|| Local::now().date_naive());

    let model = expense::ActiveModel {
        user_id: Set(new_expense.user_id),
        category: Set(category.to_string()),
        amount: Set(amount),
        description: Set(description),
        date: Set(date),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!(
        "Created expense_id {} for user_id {}: category='{}', amount={:.2}, date={}",
        created.id, created.user_id, created.category, created.amount, created.date
    );
    Ok(created)
}

/// Returns a user's expenses, newest first.
///
/// An unknown user simply has no expenses.
pub async fn get_expenses_by_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::UserId.eq(user_id))
        .order_by_desc(expense::Column::Date)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns every expense in the system.
pub async fn get_all_expenses(db: &DatabaseConnection) -> Result<Vec<expense::Model>> {
    Expense::find()
        .order_by_asc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

impl ExpenseStore for DatabaseConnection {
    async fn sum_amount_in_range(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<f64> {
        let total: Option<Option<f64>> = Expense::find()
            .select_only()
            .column_as(expense::Column::Amount.sum(), "total")
            .filter(expense::Column::UserId.eq(user_id))
            .filter(expense::Column::Date.between(start, end))
            .into_tuple()
            .one(self)
            .await?;

        let total = total.flatten().unwrap_or(0.0);
        debug!(
            "Spending for user_id {} from {} to {}: ${:.2}",
            user_id, start, end, total
        );
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::analysis::ExpenseAnalyzer;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_expense_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let base = NewExpense {
            user_id: 1,
            category: "food".to_string(),
            amount: 5.0,
            description: None,
            date: None,
        };

        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let result = create_expense(
                &db,
                NewExpense {
                    amount: bad,
                    ..base.clone()
                },
            )
            .await;
            assert!(matches!(
                result.unwrap_err(),
                Error::InvalidAmount { amount: _ }
            ));
        }

        let result = create_expense(
            &db,
            NewExpense {
                category: "  ".to_string(),
                ..base
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_expense_unknown_user() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_test_expense(&db, 999, 5.0, test_date(2025, 6, 1)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::UserNotFound { id: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_expense_defaults_date_to_today() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let created = create_expense(
            &db,
            NewExpense {
                user_id: user.id,
                category: "coffee".to_string(),
                amount: 0.0,
                description: Some("  ".to_string()),
                date: None,
            },
        )
        .await?;

        assert_eq!(created.date, Local::now().date_naive());
        assert_eq!(created.amount, 0.0);
        assert!(created.description.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_get_expenses_by_user_newest_first() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let older = create_test_expense(&db, user.id, 1.0, test_date(2025, 5, 1)).await?;
        let newer = create_test_expense(&db, user.id, 2.0, test_date(2025, 6, 1)).await?;
        let same_day = create_test_expense(&db, user.id, 3.0, test_date(2025, 6, 1)).await?;

        let ids: Vec<i64> = get_expenses_by_user(&db, user.id)
            .await?
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![same_day.id, newer.id, older.id]);

        assert!(get_expenses_by_user(&db, 12345).await?.is_empty());
        assert_eq!(get_all_expenses(&db).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_sum_amount_in_range_is_inclusive() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let other = create_test_user(&db, &test_auth(), "other@example.com").await?;
        create_test_expense(&db, user.id, 1.25, test_date(2025, 6, 1)).await?;
        create_test_expense(&db, user.id, 2.5, test_date(2025, 6, 15)).await?;
        create_test_expense(&db, user.id, 100.0, test_date(2025, 6, 16)).await?;
        create_test_expense(&db, other.id, 50.0, test_date(2025, 6, 10)).await?;

        let total = db
            .sum_amount_in_range(user.id, test_date(2025, 6, 1), test_date(2025, 6, 15))
            .await?;
        assert_eq!(total, 3.75);

        let empty = db
            .sum_amount_in_range(user.id, test_date(2024, 1, 1), test_date(2024, 12, 31))
            .await?;
        assert_eq!(empty, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_analyzer_against_database() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        // Reference: Wednesday 2025-06-18
        create_test_expense(&db, user.id, 10.0, test_date(2025, 6, 16)).await?;
        create_test_expense(&db, user.id, 5.0, test_date(2025, 6, 17)).await?;
        create_test_expense(&db, user.id, 20.0, test_date(2025, 6, 11)).await?;
        create_test_expense(&db, user.id, 400.0, test_date(2025, 5, 20)).await?;

        let result = ExpenseAnalyzer::new(&db)
            .analyze(user.id, test_date(2025, 6, 18))
            .await?;

        assert_eq!(result.this_week_spent, 15.0);
        assert_eq!(result.last_week_spent, 20.0);
        assert_eq!(result.saved_this_week, 5.0);
        assert_eq!(result.this_month_spent, 35.0);
        assert_eq!(result.last_month_spent, 400.0);
        assert_eq!(result.saved_this_month, 365.0);
        Ok(())
    }
}
