//! Core business logic - framework-agnostic user, expense, goal, and analytics operations.
//!
//! Nothing here knows about HTTP; the `api` layer translates requests into these
//! calls and maps [`crate::errors::Error`] onto responses.

/// Weekly and monthly spending analysis
pub mod analysis;
/// Password hashing and bearer tokens
pub mod auth;
/// Keyword-matched advice replies
pub mod advice;
/// Expense recording and the database-backed expense store
pub mod expense;
/// Saving goal management
pub mod saving_goal;
/// Registration, login, and account management
pub mod user;
