//! Checkout draft
//!
//! The cart lives on the client until checkout. It is carried through the
//! flow as an explicit value object — the lifecycle manager never reads
//! ambient state.

use serde::{Deserialize, Serialize};

/// One cart line: a quantity of one product from one stallholder
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DraftLine {
    /// Owning merchant; fixed for the lifetime of the resulting line item
    pub merchant_id: i64,
    /// Product name snapshot — later product edits must not alter the order
    pub product_name: String,
    pub quantity: i32,
    /// Display unit, e.g. "kg", "un", "dz"
    pub unit_label: String,
    /// Price per unit in currency units
    pub unit_price: f64,
}

/// Client-held order draft, submitted at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftOrder {
    pub customer_id: i64,
    pub lines: Vec<DraftLine>,
    /// Market entrance where the courier picks the order up
    pub pickup_entrance: String,
    /// Agreed pickup time (millis since epoch)
    pub pickup_time: i64,
    /// Opaque payment method tag ("PIX", "CARD", ...); confirmation is simulated
    pub payment_method: String,
    pub delivery_fee: f64,
}

impl DraftOrder {
    /// Distinct merchants contributing lines, in first-appearance order
    pub fn merchant_ids(&self) -> Vec<i64> {
        let mut ids = Vec::new();
        for line in &self.lines {
            if !ids.contains(&line.merchant_id) {
                ids.push(line.merchant_id);
            }
        }
        ids
    }
}
