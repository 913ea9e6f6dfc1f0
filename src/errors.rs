//! Unified error types and result handling.
//!
//! Every fallible operation in the crate returns [`Result`]. The HTTP layer maps
//! these variants onto status codes in [`crate::api::error`].

use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure reported by the underlying store (connection or query error)
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Invalid or missing configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// A request field failed a boundary check
    #[error("Validation error: {message}")]
    Validation {
        /// Which field was rejected and why
        message: String,
    },

    /// Monetary amounts must be finite and non-negative
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// No user with the given id exists
    #[error("User not found: {id}")]
    UserNotFound {
        /// Id or email that was looked up
        id: String,
    },

    /// The saving goal does not exist or is owned by another user
    #[error("Goal not found or user does not own goal: {id}")]
    GoalNotFound {
        /// Goal id that was looked up
        id: i64,
    },

    /// Registration attempted with an email that is already in use
    #[error("Email already registered: {email}")]
    EmailAlreadyRegistered {
        /// The conflicting email
        email: String,
    },

    /// Email unknown or password mismatch (deliberately indistinguishable)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing, malformed, or expired bearer token
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Reason the token was rejected
        message: String,
    },

    /// The password hasher itself failed (not a mismatch)
    #[error("Password hashing error: {message}")]
    PasswordHash {
        /// Error reported by the hasher
        message: String,
    },

    /// Token encoding failed
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// I/O failure (config file, listener socket)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
