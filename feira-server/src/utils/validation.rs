//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are applied
//! before any store call.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: merchant, courier, product snapshot, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: stall numbers, unit labels, payment method tags
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Pickup entrance descriptions
pub const MAX_ENTRANCE_LEN: usize = 200;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}
