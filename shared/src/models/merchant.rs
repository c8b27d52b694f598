//! Merchant Model

use serde::{Deserialize, Serialize};

/// Merchant stallholder entity (摊主)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Merchant {
    pub id: i64,
    pub name: String,
    /// Stall identifier inside the market, e.g. "B-14"
    pub stall: String,
    /// Accumulated revenue in currency units, accrued on item acceptance
    pub revenue_total: f64,
    pub created_at: i64,
}

/// Create merchant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantCreate {
    pub name: String,
    pub stall: String,
}
