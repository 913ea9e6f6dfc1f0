//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod auth;
pub mod chatbot;
pub mod expenses;
pub mod goals;
pub mod users;

// Re-export all handlers for use in router
pub use auth::*;
pub use chatbot::*;
pub use expenses::*;
pub use goals::*;
pub use users::*;
