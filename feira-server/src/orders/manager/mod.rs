//! OrdersManager - the order lifecycle state machine
//!
//! Owns every order and line-item transition, enforces per-actor guards,
//! and derives the aggregate order status from line-item statuses.
//!
//! # Transition flow
//!
//! ```text
//! create_order            PENDING_PAYMENT        (items all PENDING)
//!   └─ mark_paid          AWAITING_MERCHANT_APPROVAL
//!       └─ set_line_item_status (per merchant, per item)
//!           └─ rollup     APPROVED | REJECTED | stay
//!               └─ claim_order_for_delivery   (first-claim-wins CAS)
//!                   └─ mark_en_route          EN_ROUTE
//!                       └─ mark_awaiting_confirmation
//!                           └─ confirm_delivery   DELIVERED (+wallet credit)
//! ```
//!
//! Every guarded mutation is a single conditional UPDATE; zero rows affected
//! is treated as a guard failure and classified by re-fetching the entity.

mod error;
pub use error::*;

use crate::db::DbService;
use crate::db::repository::{courier, merchant, order};
use crate::orders::money;
use shared::models::{Order, OrderDetail, OrderLineItem, PendingItem};
use shared::order::{DraftOrder, ItemDecision, LineItemStatus, OrderScope, OrderStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

/// Maximum line count per order (sanity bound, mirrors cart UI limit)
const MAX_LINES_PER_ORDER: usize = 100;

/// Order lifecycle manager
///
/// Stateless over a shared pool; safe to clone into handlers and tasks.
#[derive(Clone)]
pub struct OrdersManager {
    pool: SqlitePool,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager").finish()
    }
}

impl OrdersManager {
    pub fn new(db: &DbService) -> Self {
        Self {
            pool: db.pool.clone(),
        }
    }

    // ========== Checkout ==========

    /// Create an order from a checkout draft.
    ///
    /// Validates the draft, computes totals with decimal arithmetic, and
    /// persists the order with its line items atomically. Line items are
    /// grouped by merchant (cart order preserved within each group).
    pub async fn create_order(&self, draft: DraftOrder) -> OrderResult<OrderDetail> {
        // 1. Validate before any store call
        if draft.lines.is_empty() {
            return Err(OrderError::Validation("cart must not be empty".to_string()));
        }
        if draft.lines.len() > MAX_LINES_PER_ORDER {
            return Err(OrderError::Validation(format!(
                "cart exceeds {} lines",
                MAX_LINES_PER_ORDER
            )));
        }
        if draft.pickup_entrance.trim().is_empty() {
            return Err(OrderError::Validation(
                "pickup_entrance must be selected".to_string(),
            ));
        }
        if draft.pickup_time <= 0 {
            return Err(OrderError::Validation(
                "pickup_time must be selected".to_string(),
            ));
        }
        if draft.payment_method.trim().is_empty() {
            return Err(OrderError::Validation(
                "payment_method must be selected".to_string(),
            ));
        }
        for line in &draft.lines {
            money::validate_draft_line(line)?;
        }
        money::validate_delivery_fee(draft.delivery_fee)?;

        // 2. Referenced merchants must exist
        for merchant_id in draft.merchant_ids() {
            if merchant::find_by_id(&self.pool, merchant_id).await?.is_none() {
                return Err(OrderError::NotFound(format!(
                    "Merchant {merchant_id} not found"
                )));
            }
        }

        // 3. Totals: subtotal = Σ line_total, total = subtotal + delivery_fee
        let subtotal = money::subtotal(&draft.lines);
        let total = subtotal + money::to_decimal(draft.delivery_fee);

        let now = now_millis();
        let order_id = snowflake_id();
        let record = Order {
            id: order_id,
            customer_id: draft.customer_id,
            status: OrderStatus::PendingPayment,
            pickup_entrance: draft.pickup_entrance.trim().to_string(),
            pickup_time: draft.pickup_time,
            subtotal: money::to_f64(subtotal),
            delivery_fee: money::to_f64(money::to_decimal(draft.delivery_fee)),
            total: money::to_f64(total),
            payment_method: draft.payment_method.clone(),
            paid_at: None,
            courier_id: None,
            created_at: now,
        };

        // 4. Build items grouped by merchant, all PENDING
        let mut items = Vec::with_capacity(draft.lines.len());
        for merchant_id in draft.merchant_ids() {
            for line in draft.lines.iter().filter(|l| l.merchant_id == merchant_id) {
                items.push(OrderLineItem {
                    id: snowflake_id(),
                    order_id,
                    merchant_id,
                    product_name: line.product_name.clone(),
                    quantity: line.quantity,
                    unit_label: line.unit_label.clone(),
                    unit_price: money::to_f64(money::to_decimal(line.unit_price)),
                    line_total: money::to_f64(money::line_total(line)),
                    status: LineItemStatus::Pending,
                });
            }
        }

        // 5. Persist atomically
        let merchant_count = draft.merchant_ids().len();
        let mut tx = self.pool.begin().await?;
        order::insert(&mut tx, &record, &items).await?;
        tx.commit().await?;

        tracing::info!(
            order_id,
            customer_id = record.customer_id,
            merchants = merchant_count,
            total = record.total,
            "Order created"
        );

        Ok(OrderDetail {
            order: record,
            items,
        })
    }

    // ========== Payment ==========

    /// Record the simulated payment confirmation. Applies exactly once;
    /// repeated calls fail with Conflict and leave `paid_at` unchanged.
    pub async fn mark_paid(&self, order_id: i64) -> OrderResult<Order> {
        let now = now_millis();
        let rows = order::mark_paid(&self.pool, order_id, now).await?;
        if rows == 0 {
            // Guard failed — re-fetch to tell the caller why
            let existing = order::find_by_id(&self.pool, order_id).await?;
            return Err(match existing {
                None => OrderError::NotFound(format!("Order {order_id} not found")),
                Some(o) if o.paid_at.is_some() => {
                    OrderError::Conflict(format!("Order {order_id} is already paid"))
                }
                Some(o) => OrderError::Conflict(format!(
                    "Order {order_id} is not payable in status {}",
                    o.status.as_str()
                )),
            });
        }

        tracing::info!(order_id, "Order paid, awaiting merchant approval");
        self.fetch_order(order_id).await
    }

    // ========== Merchant decisions ==========

    /// Accept or reject one PENDING line item on behalf of its owning
    /// merchant, then recompute the aggregate order status in the same
    /// transaction. Accepting accrues the line total to the merchant's
    /// revenue.
    pub async fn set_line_item_status(
        &self,
        item_id: i64,
        actor_merchant_id: i64,
        decision: ItemDecision,
    ) -> OrderResult<OrderLineItem> {
        let mut tx = self.pool.begin().await?;

        let item = order::find_item(&mut *tx, item_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Line item {item_id} not found")))?;

        // Items of other merchants are not visible to the actor
        if item.merchant_id != actor_merchant_id {
            return Err(OrderError::NotFound(format!(
                "Line item {item_id} not found"
            )));
        }

        // Items must not be actionable before payment
        let parent = order::find_by_id(&mut *tx, item.order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Order {} not found", item.order_id)))?;
        if parent.paid_at.is_none() {
            return Err(OrderError::Conflict(format!(
                "Order {} is not paid yet",
                item.order_id
            )));
        }

        let to = decision.item_status();
        let rows = order::set_item_status(&mut *tx, item_id, actor_merchant_id, to).await?;
        if rows == 0 {
            // Already decided (double submission or concurrent tab)
            return Err(OrderError::Conflict(format!(
                "Line item {item_id} is already decided"
            )));
        }

        if decision == ItemDecision::Accepted {
            merchant::accrue_revenue(&mut *tx, actor_merchant_id, item.line_total).await?;
        }

        // Rollup runs inside the same transaction as the item change
        let status = Self::recompute_order_status(&mut tx, item.order_id).await?;

        tx.commit().await?;

        tracing::info!(
            item_id,
            order_id = item.order_id,
            merchant_id = actor_merchant_id,
            decision = to.as_str(),
            order_status = status.as_str(),
            "Line item resolved"
        );

        order::find_item(&self.pool, item_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Line item {item_id} not found")))
    }

    /// Derive the aggregate status from the item set (the rollup rule).
    ///
    /// Single implementation, invoked after every line-item change:
    /// - any PENDING item        → order stays AWAITING_MERCHANT_APPROVAL
    /// - none PENDING, none REJECTED → APPROVED (enters the courier pull list)
    /// - none PENDING, all REJECTED  → REJECTED (terminal)
    /// - mixed accepted/rejected → stays AWAITING_MERCHANT_APPROVAL (no
    ///   defined order-level outcome; flagged in the log)
    async fn recompute_order_status(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        order_id: i64,
    ) -> OrderResult<OrderStatus> {
        let (pending, accepted, rejected) = order::count_item_statuses(&mut **tx, order_id).await?;

        if pending > 0 {
            return Ok(OrderStatus::AwaitingMerchantApproval);
        }

        if rejected == 0 {
            order::set_status_guarded(
                &mut **tx,
                order_id,
                OrderStatus::AwaitingMerchantApproval,
                OrderStatus::Approved,
            )
            .await?;
            tracing::info!(order_id, accepted, "All items accepted, order approved");
            return Ok(OrderStatus::Approved);
        }

        if accepted == 0 {
            order::set_status_guarded(
                &mut **tx,
                order_id,
                OrderStatus::AwaitingMerchantApproval,
                OrderStatus::Rejected,
            )
            .await?;
            tracing::info!(order_id, rejected, "All items rejected, order rejected");
            return Ok(OrderStatus::Rejected);
        }

        // 部分接受/部分拒绝 - 订单层面没有定义的结果，保持待确认并记录
        tracing::warn!(
            order_id,
            accepted,
            rejected,
            "Mixed accept/reject outcome, order left awaiting approval"
        );
        Ok(OrderStatus::AwaitingMerchantApproval)
    }

    // ========== Courier delivery ==========

    /// First-claim-wins courier assignment. The guard (`courier_id IS NULL`
    /// and status APPROVED) is checked and set as one conditional update;
    /// the losing claim gets a Conflict and should refresh its pull list.
    pub async fn claim_order_for_delivery(
        &self,
        order_id: i64,
        actor_courier_id: i64,
    ) -> OrderResult<Order> {
        if courier::find_by_id(&self.pool, actor_courier_id).await?.is_none() {
            return Err(OrderError::NotFound(format!(
                "Courier {actor_courier_id} not found"
            )));
        }

        let rows = order::claim(&self.pool, order_id, actor_courier_id).await?;
        if rows == 0 {
            let existing = order::find_by_id(&self.pool, order_id).await?;
            return Err(match existing {
                None => OrderError::NotFound(format!("Order {order_id} not found")),
                Some(o) if o.courier_id.is_some() => OrderError::Conflict(format!(
                    "Order {order_id} was already claimed by another courier"
                )),
                Some(o) => OrderError::Conflict(format!(
                    "Order {order_id} is not available in status {}",
                    o.status.as_str()
                )),
            });
        }

        tracing::info!(order_id, courier_id = actor_courier_id, "Order claimed");
        self.fetch_order(order_id).await
    }

    /// The assigned courier departs with the order (APPROVED → EN_ROUTE)
    pub async fn mark_en_route(
        &self,
        order_id: i64,
        actor_courier_id: i64,
    ) -> OrderResult<Order> {
        self.advance_delivery(
            order_id,
            actor_courier_id,
            OrderStatus::Approved,
            OrderStatus::EnRoute,
        )
        .await
    }

    /// The assigned courier hands the order off and waits for the customer
    /// (EN_ROUTE → AWAITING_RECEIPT_CONFIRMATION)
    pub async fn mark_awaiting_confirmation(
        &self,
        order_id: i64,
        actor_courier_id: i64,
    ) -> OrderResult<Order> {
        self.advance_delivery(
            order_id,
            actor_courier_id,
            OrderStatus::EnRoute,
            OrderStatus::AwaitingReceiptConfirmation,
        )
        .await
    }

    async fn advance_delivery(
        &self,
        order_id: i64,
        actor_courier_id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> OrderResult<Order> {
        let rows =
            order::advance_by_courier(&self.pool, order_id, actor_courier_id, from, to).await?;
        if rows == 0 {
            let existing = order::find_by_id(&self.pool, order_id).await?;
            return Err(match existing {
                None => OrderError::NotFound(format!("Order {order_id} not found")),
                Some(o) if o.courier_id != Some(actor_courier_id) => OrderError::Conflict(
                    format!("Order {order_id} is not assigned to this courier"),
                ),
                Some(o) => OrderError::Conflict(format!(
                    "Order {order_id} cannot move to {} from {}",
                    to.as_str(),
                    o.status.as_str()
                )),
            });
        }

        tracing::info!(
            order_id,
            courier_id = actor_courier_id,
            status = to.as_str(),
            "Delivery advanced"
        );
        self.fetch_order(order_id).await
    }

    /// Customer confirms receipt, closing the order. The courier wallet is
    /// credited with the delivery fee and the delivery counter bumped in the
    /// same transaction as the status change.
    pub async fn confirm_delivery(
        &self,
        order_id: i64,
        actor_customer_id: i64,
    ) -> OrderResult<Order> {
        let mut tx = self.pool.begin().await?;

        let existing = order::find_by_id(&mut *tx, order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Order {order_id} not found")))?;

        let rows = order::confirm_delivery(&mut *tx, order_id, actor_customer_id).await?;
        if rows == 0 {
            return Err(if existing.customer_id != actor_customer_id {
                // Orders of other customers are not visible to the actor
                OrderError::NotFound(format!("Order {order_id} not found"))
            } else {
                OrderError::Conflict(format!(
                    "Order {order_id} is not awaiting receipt confirmation (status {})",
                    existing.status.as_str()
                ))
            });
        }

        // Invariant: an order in AWAITING_RECEIPT_CONFIRMATION has a courier
        let courier_id = existing.courier_id.ok_or_else(|| {
            OrderError::Conflict(format!("Order {order_id} has no assigned courier"))
        })?;
        courier::credit_delivery(&mut *tx, courier_id, existing.delivery_fee).await?;

        tx.commit().await?;

        tracing::info!(
            order_id,
            courier_id,
            fee = existing.delivery_fee,
            "Delivery confirmed, courier credited"
        );
        self.fetch_order(order_id).await
    }

    // ========== Maintenance ==========

    /// Cancel PENDING_PAYMENT orders older than `ttl_ms` (abandoned carts
    /// never shown to merchants). Returns the number of orders cancelled.
    pub async fn cancel_stale_unpaid(&self, ttl_ms: i64) -> OrderResult<u64> {
        let cutoff = now_millis() - ttl_ms;
        let cancelled = order::cancel_stale_unpaid(&self.pool, cutoff).await?;
        if cancelled > 0 {
            tracing::info!(cancelled, "Cancelled stale unpaid orders");
        }
        Ok(cancelled)
    }

    // ========== Query views ==========

    /// Merchant work queue: PENDING items whose parent order is paid
    pub async fn list_merchant_pending_items(
        &self,
        merchant_id: i64,
    ) -> OrderResult<Vec<PendingItem>> {
        Ok(order::pending_items_for_merchant(&self.pool, merchant_id).await?)
    }

    /// Courier pull list: APPROVED, unassigned, paid orders
    pub async fn list_available_orders_for_courier(&self) -> OrderResult<Vec<Order>> {
        Ok(order::available_for_courier(&self.pool).await?)
    }

    /// A customer's orders, split into active and history views
    pub async fn list_customer_orders(
        &self,
        customer_id: i64,
        scope: OrderScope,
    ) -> OrderResult<Vec<Order>> {
        let statuses: &[OrderStatus] = match scope {
            OrderScope::Active => &OrderStatus::ACTIVE,
            OrderScope::History => &OrderStatus::HISTORY,
        };
        Ok(order::for_customer(&self.pool, customer_id, statuses).await?)
    }

    /// Full order detail (order + line items)
    pub async fn get_order_detail(&self, order_id: i64) -> OrderResult<OrderDetail> {
        let order = self.fetch_order(order_id).await?;
        let items = order::find_items(&self.pool, order_id).await?;
        Ok(OrderDetail { order, items })
    }

    async fn fetch_order(&self, order_id: i64) -> OrderResult<Order> {
        order::find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Order {order_id} not found")))
    }
}

#[cfg(test)]
mod tests;
