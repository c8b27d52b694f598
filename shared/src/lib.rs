//! Shared types for the Feira marketplace
//!
//! Domain models, order lifecycle types, and utility helpers used by the
//! server and by API clients.

pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
