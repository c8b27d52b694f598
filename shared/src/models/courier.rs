//! Courier Model

use serde::{Deserialize, Serialize};

/// Delivery courier entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Courier {
    pub id: i64,
    pub name: String,
    pub is_available: bool,
    /// Accumulated delivery fees in currency units, credited on delivery
    pub wallet_balance: f64,
    pub deliveries_count: i64,
    pub created_at: i64,
}

/// Create courier payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierCreate {
    pub name: String,
}
