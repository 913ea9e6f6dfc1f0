//! Database configuration module for `PocketLedger`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the foreign keys (and their `ON DELETE CASCADE`) follow the `belongs_to` relations
//! declared on the expense and saving goal entities.

use crate::entities::{Expense, SavingGoal, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info};

/// Default database location used when neither config.toml nor `DATABASE_URL` set one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/pocket_ledger.sqlite?mode=rwc";

/// Creates the directory holding a file-backed `SQLite` database, if missing.
fn ensure_sqlite_dir(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = rest.split('?').next().unwrap_or_default();
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Establishes a connection pool to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database at {}", database_url);
    ensure_sqlite_dir(database_url)?;
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables that do not exist yet.
///
/// Users are created first since expenses and saving goals reference them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    let mut expense_table = schema.create_table_from_entity(Expense);
    let mut saving_goal_table = schema.create_table_from_entity(SavingGoal);

    user_table.if_not_exists();
    expense_table.if_not_exists();
    saving_goal_table.if_not_exists();

    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&expense_table)).await?;
    db.execute(builder.build(&saving_goal_table)).await?;

    info!("Database tables ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ExpenseModel, SavingGoalModel, UserModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<ExpenseModel> = Expense::find().limit(1).all(&db).await?;
        let _: Vec<SavingGoalModel> = SavingGoal::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[test]
    fn test_ensure_sqlite_dir() -> Result<()> {
        ensure_sqlite_dir("sqlite::memory:")?;
        ensure_sqlite_dir("sqlite://flat.sqlite?mode=rwc")?;

        let dir = std::env::temp_dir().join(format!("pocket-ledger-{}", std::process::id()));
        let url = format!("sqlite://{}/nested/app.sqlite?mode=rwc", dir.display());
        ensure_sqlite_dir(&url)?;
        assert!(dir.join("nested").is_dir());
        std::fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
