//! User business logic - registration, authentication, and account management.
//!
//! Passwords are hashed by the injected [`AuthService`] before they reach the
//! database. Lookups return `Option` so callers decide whether absence is an error;
//! operations that need the user to exist return [`Error::UserNotFound`].

use crate::{
    core::auth::AuthService,
    entities::{Expense, SavingGoal, User, expense, saving_goal, user},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, SqlErr, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Maximum stored length of a user's name
pub const MAX_NAME_LEN: usize = 100;
/// Maximum stored length of an email address
pub const MAX_EMAIL_LEN: usize = 150;

/// Registration input.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Plain-text password; hashed before storage
    pub password: String,
    /// Optional date of birth
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Optional age
    #[serde(default)]
    pub age: Option<i32>,
    /// Optional gender
    #[serde(default)]
    pub gender: Option<String>,
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    /// User id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Optional date of birth
    pub date_of_birth: Option<NaiveDate>,
    /// Optional age
    pub age: Option<i32>,
    /// Optional gender
    pub gender: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            date_of_birth: model.date_of_birth,
            age: model.age,
            gender: model.gender,
        }
    }
}

fn require_text(field: &str, value: &str, max_len: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: format!("{field} cannot be empty"),
        });
    }
    if trimmed.chars().count() > max_len {
        return Err(Error::Validation {
            message: format!("{field} cannot exceed {max_len} characters"),
        });
    }
    Ok(trimmed.to_string())
}

fn require_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(Error::Validation {
            message: "password cannot be empty".to_string(),
        });
    }
    Ok(())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Maps a failed user insert, reporting a lost race on the unique email index as
/// a duplicate registration.
fn registration_error(err: DbErr, email: &str) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::EmailAlreadyRegistered {
            email: email.to_string(),
        },
        _ => err.into(),
    }
}

/// Finds a user by primary key.
pub async fn get_user_by_id(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by email, ignoring case and surrounding whitespace.
pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(normalize_email(email)))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns every user ordered by id.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Registers a new user.
///
/// Name and email are trimmed and must be non-blank. Emails are stored lowercased
/// and must not already be registered.
#[instrument(skip(db, auth, new_user), fields(email = %new_user.email))]
pub async fn create_user(
    db: &DatabaseConnection,
    auth: &AuthService,
    new_user: NewUser,
) -> Result<user::Model> {
    let name = require_text("name", &new_user.name, MAX_NAME_LEN)?;
    let email = normalize_email(&require_text("email", &new_user.email, MAX_EMAIL_LEN)?);
    require_password(&new_user.password)?;

    if get_user_by_email(db, &email).await?.is_some() {
        return Err(Error::EmailAlreadyRegistered { email });
    }

    let password = auth.hash_password(&new_user.password)?;
    let model = user::ActiveModel {
        name: Set(name),
        email: Set(email.clone()),
        password: Set(password),
        date_of_birth: Set(new_user.date_of_birth),
        age: Set(new_user.age),
        gender: Set(new_user.gender),
        ..Default::default()
    };

    let created = model
        .insert(db)
        .await
        .map_err(|e| registration_error(e, &email))?;
    info!("Registered user_id {}", created.id);
    Ok(created)
}

/// Checks an email/password pair and returns the matching user.
///
/// Unknown emails and wrong passwords produce the same error.
#[instrument(skip(db, auth, password))]
pub async fn authenticate(
    db: &DatabaseConnection,
    auth: &AuthService,
    email: &str,
    password: &str,
) -> Result<user::Model> {
    let Some(user) = get_user_by_email(db, email).await? else {
        warn!("Login attempt for unknown email");
        return Err(Error::InvalidCredentials);
    };

    if !auth.verify_password(password, &user.password) {
        warn!("Login attempt with wrong password for user_id {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    Ok(user)
}

/// Confirms identity details before a password reset.
///
/// The name comparison ignores case and surrounding whitespace; the date of birth
/// must match exactly and must have been recorded at registration.
#[instrument(skip(db, name, date_of_birth))]
pub async fn verify_user_details(
    db: &DatabaseConnection,
    email: &str,
    name: &str,
    date_of_birth: NaiveDate,
) -> Result<user::Model> {
    let user = get_user_by_email(db, email)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            id: email.trim().to_string(),
        })?;

    let name_matches = user.name.trim().eq_ignore_ascii_case(name.trim());
    if !name_matches || user.date_of_birth != Some(date_of_birth) {
        warn!("Identity details did not match for user_id {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    Ok(user)
}

/// Replaces a user's password once their identity details check out.
///
/// Fails exactly like [`verify_user_details`] when the email is unknown or the
/// name or date of birth do not match; the stored hash is left untouched.
#[instrument(skip(db, auth, name, date_of_birth, new_password))]
pub async fn reset_password(
    db: &DatabaseConnection,
    auth: &AuthService,
    email: &str,
    name: &str,
    date_of_birth: NaiveDate,
    new_password: &str,
) -> Result<user::Model> {
    require_password(new_password)?;

    let user = verify_user_details(db, email, name, date_of_birth).await?;

    let user_id = user.id;
    let mut active: user::ActiveModel = user.into();
    active.password = Set(auth.hash_password(new_password)?);
    let updated = active.update(db).await?;

    info!("Password reset for user_id {}", user_id);
    Ok(updated)
}

/// Deletes a user together with every expense and saving goal they own.
#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let user = User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            id: user_id.to_string(),
        })?;

    let expenses = Expense::delete_many()
        .filter(expense::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    let goals = SavingGoal::delete_many()
        .filter(saving_goal::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    user.delete(&txn).await?;

    txn.commit().await?;
    info!(
        "Deleted user_id {} with {} expenses and {} saving goals",
        user_id, expenses.rows_affected, goals.rows_affected
    );
    Ok(())
}
