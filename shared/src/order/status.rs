//! Order and line item status enums

use serde::{Deserialize, Serialize};

/// Order aggregate status (订单状态)
///
/// The client-local cart (DRAFT) is never persisted; a persisted order
/// always starts at `PendingPayment`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    /// 待付款 - created at checkout, visible only to its customer
    #[default]
    PendingPayment,
    /// 待商户确认 - paid, waiting for every stallholder to decide
    AwaitingMerchantApproval,
    /// All line items accepted; available on the courier pull list
    Approved,
    /// Courier is delivering
    EnRoute,
    /// Courier handed off, waiting for the customer to confirm receipt
    AwaitingReceiptConfirmation,
    /// Terminal: receipt confirmed
    Delivered,
    /// Terminal: abandoned before payment (stale-order sweep)
    Cancelled,
    /// Terminal: every line item was rejected
    Rejected,
}

impl OrderStatus {
    /// Stable string form used in SQL filters and wire payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPayment => "PENDING_PAYMENT",
            Self::AwaitingMerchantApproval => "AWAITING_MERCHANT_APPROVAL",
            Self::Approved => "APPROVED",
            Self::EnRoute => "EN_ROUTE",
            Self::AwaitingReceiptConfirmation => "AWAITING_RECEIPT_CONFIRMATION",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Terminal states are retained for history and never mutate again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Rejected)
    }

    /// Statuses shown in the customer's "active" view
    pub const ACTIVE: [OrderStatus; 5] = [
        Self::PendingPayment,
        Self::AwaitingMerchantApproval,
        Self::Approved,
        Self::EnRoute,
        Self::AwaitingReceiptConfirmation,
    ];

    /// Statuses shown in the customer's "history" view
    pub const HISTORY: [OrderStatus; 3] = [Self::Delivered, Self::Cancelled, Self::Rejected];
}

/// Per-item status, decided by the merchant owning the item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum LineItemStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl LineItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        }
    }
}

/// A merchant's decision on one of their pending items
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemDecision {
    Accepted,
    Rejected,
}

impl ItemDecision {
    /// The item status this decision resolves to
    pub fn item_status(&self) -> LineItemStatus {
        match self {
            Self::Accepted => LineItemStatus::Accepted,
            Self::Rejected => LineItemStatus::Rejected,
        }
    }
}

/// Which slice of a customer's orders to list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderScope {
    #[default]
    Active,
    History,
}
