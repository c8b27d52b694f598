//! Order Model

use crate::order::{LineItemStatus, OrderStatus};
use serde::{Deserialize, Serialize};

/// Order entity
///
/// Monetary fields are fixed at creation (`total == subtotal + delivery_fee`);
/// only `status`, `paid_at` and `courier_id` mutate afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub status: OrderStatus,
    /// Market entrance where the courier picks the order up
    pub pickup_entrance: String,
    /// Agreed pickup time (millis)
    pub pickup_time: i64,
    /// Sum of line totals in currency units
    pub subtotal: f64,
    /// Flat delivery fee in currency units
    pub delivery_fee: f64,
    /// subtotal + delivery_fee
    pub total: f64,
    pub payment_method: String,
    /// Set once by the (simulated) payment confirmation
    pub paid_at: Option<i64>,
    /// Set once by the winning courier claim
    pub courier_id: Option<i64>,
    pub created_at: i64,
}

/// Order line item: one merchant's contribution within a multi-merchant order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLineItem {
    pub id: i64,
    pub order_id: i64,
    /// Owning merchant; fixed at creation
    pub merchant_id: i64,
    /// Product name snapshot taken at order time
    pub product_name: String,
    pub quantity: i32,
    pub unit_label: String,
    /// Price per unit in currency units
    pub unit_price: f64,
    /// quantity * unit_price
    pub line_total: f64,
    pub status: LineItemStatus,
}

/// Order with its line items (detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderLineItem>,
}

/// A pending line item joined with pickup context (merchant work queue)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PendingItem {
    pub id: i64,
    pub order_id: i64,
    pub merchant_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_label: String,
    pub unit_price: f64,
    pub line_total: f64,
    /// When the parent order was paid (millis)
    pub paid_at: i64,
    pub pickup_time: i64,
}
