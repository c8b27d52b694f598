//! Data models
//!
//! Shared between feira-server and the actor-facing apps (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod courier;
pub mod merchant;
pub mod order;

// Re-exports
pub use courier::*;
pub use merchant::*;
pub use order::*;
