//! Order Repository
//!
//! Rows for `orders` and `order_line_item`. Lifecycle guards are expressed
//! as conditional UPDATEs; the manager classifies zero-rows outcomes by
//! re-fetching the entity.

use super::RepoResult;
use shared::models::{Order, OrderLineItem, PendingItem};
use shared::order::{LineItemStatus, OrderStatus};
use sqlx::sqlite::SqliteConnection;
use sqlx::SqlitePool;

const ORDER_SELECT: &str = "SELECT id, customer_id, status, pickup_entrance, pickup_time, subtotal, delivery_fee, total, payment_method, paid_at, courier_id, created_at FROM orders";

const ITEM_SELECT: &str = "SELECT id, order_id, merchant_id, product_name, quantity, unit_label, unit_price, line_total, status FROM order_line_item";

/// Insert the order row and all of its line items (one transaction scope)
pub async fn insert(
    conn: &mut SqliteConnection,
    order: &Order,
    items: &[OrderLineItem],
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, customer_id, status, pickup_entrance, pickup_time, subtotal, delivery_fee, total, payment_method, paid_at, courier_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )
    .bind(order.id)
    .bind(order.customer_id)
    .bind(order.status.as_str())
    .bind(&order.pickup_entrance)
    .bind(order.pickup_time)
    .bind(order.subtotal)
    .bind(order.delivery_fee)
    .bind(order.total)
    .bind(&order.payment_method)
    .bind(order.paid_at)
    .bind(order.courier_id)
    .bind(order.created_at)
    .execute(&mut *conn)
    .await?;

    for item in items {
        sqlx::query(
            "INSERT INTO order_line_item (id, order_id, merchant_id, product_name, quantity, unit_label, unit_price, line_total, status) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(item.id)
        .bind(item.order_id)
        .bind(item.merchant_id)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(&item.unit_label)
        .bind(item.unit_price)
        .bind(item.line_total)
        .bind(item.status.as_str())
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

pub async fn find_by_id(
    executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    id: i64,
) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

pub async fn find_items(
    executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    order_id: i64,
) -> RepoResult<Vec<OrderLineItem>> {
    let sql = format!("{ITEM_SELECT} WHERE order_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, OrderLineItem>(&sql)
        .bind(order_id)
        .fetch_all(executor)
        .await?;
    Ok(rows)
}

pub async fn find_item(
    executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    item_id: i64,
) -> RepoResult<Option<OrderLineItem>> {
    let sql = format!("{ITEM_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, OrderLineItem>(&sql)
        .bind(item_id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

/// Record the (simulated) payment confirmation. Applies at most once:
/// the guard requires an unpaid order still in PENDING_PAYMENT.
pub async fn mark_paid(
    executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    order_id: i64,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE orders SET paid_at = ?1, status = ?2 WHERE id = ?3 AND paid_at IS NULL AND status = ?4",
    )
    .bind(now)
    .bind(OrderStatus::AwaitingMerchantApproval.as_str())
    .bind(order_id)
    .bind(OrderStatus::PendingPayment.as_str())
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}

/// Resolve a PENDING item, guarded on ownership and on the item still being
/// undecided. Double submissions (e.g. two browser tabs) affect zero rows.
pub async fn set_item_status(
    executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    item_id: i64,
    merchant_id: i64,
    to: LineItemStatus,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE order_line_item SET status = ?1 WHERE id = ?2 AND merchant_id = ?3 AND status = ?4",
    )
    .bind(to.as_str())
    .bind(item_id)
    .bind(merchant_id)
    .bind(LineItemStatus::Pending.as_str())
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}

/// Item status counts for one order: (pending, accepted, rejected)
pub async fn count_item_statuses(
    executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    order_id: i64,
) -> RepoResult<(i64, i64, i64)> {
    let counts: (i64, i64, i64) = sqlx::query_as(
        "SELECT \
            COALESCE(SUM(status = 'PENDING'), 0), \
            COALESCE(SUM(status = 'ACCEPTED'), 0), \
            COALESCE(SUM(status = 'REJECTED'), 0) \
         FROM order_line_item WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_one(executor)
    .await?;
    Ok(counts)
}

/// Move an order between aggregate statuses, guarded on the expected
/// current status.
pub async fn set_status_guarded(
    executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    order_id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE orders SET status = ?1 WHERE id = ?2 AND status = ?3")
        .bind(to.as_str())
        .bind(order_id)
        .bind(from.as_str())
        .execute(executor)
        .await?;
    Ok(rows.rows_affected())
}

/// First-claim-wins courier assignment: a single conditional update on the
/// courier column. Competing claims affect zero rows.
pub async fn claim(
    executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    order_id: i64,
    courier_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE orders SET courier_id = ?1 WHERE id = ?2 AND status = ?3 AND courier_id IS NULL",
    )
    .bind(courier_id)
    .bind(order_id)
    .bind(OrderStatus::Approved.as_str())
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}

/// Courier-driven status advance, guarded on the assigned courier identity.
pub async fn advance_by_courier(
    executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    order_id: i64,
    courier_id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE orders SET status = ?1 WHERE id = ?2 AND courier_id = ?3 AND status = ?4",
    )
    .bind(to.as_str())
    .bind(order_id)
    .bind(courier_id)
    .bind(from.as_str())
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}

/// Customer receipt confirmation, guarded on the order owner.
pub async fn confirm_delivery(
    executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    order_id: i64,
    customer_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE orders SET status = ?1 WHERE id = ?2 AND customer_id = ?3 AND status = ?4",
    )
    .bind(OrderStatus::Delivered.as_str())
    .bind(order_id)
    .bind(customer_id)
    .bind(OrderStatus::AwaitingReceiptConfirmation.as_str())
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}

/// Cancel unpaid orders created before `cutoff` (stale-order sweep)
pub async fn cancel_stale_unpaid(
    executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    cutoff: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE orders SET status = ?1 WHERE status = ?2 AND paid_at IS NULL AND created_at < ?3",
    )
    .bind(OrderStatus::Cancelled.as_str())
    .bind(OrderStatus::PendingPayment.as_str())
    .bind(cutoff)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}

// ========== View queries ==========

/// Merchant work queue: undecided items on paid orders
pub async fn pending_items_for_merchant(
    pool: &SqlitePool,
    merchant_id: i64,
) -> RepoResult<Vec<PendingItem>> {
    let rows = sqlx::query_as::<_, PendingItem>(
        "SELECT li.id, li.order_id, li.merchant_id, li.product_name, li.quantity, li.unit_label, li.unit_price, li.line_total, o.paid_at, o.pickup_time \
         FROM order_line_item li \
         JOIN orders o ON o.id = li.order_id \
         WHERE li.merchant_id = ?1 AND li.status = 'PENDING' AND o.paid_at IS NOT NULL \
         ORDER BY o.paid_at, li.id",
    )
    .bind(merchant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Courier pull list: approved, unassigned, paid orders
pub async fn available_for_courier(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "{ORDER_SELECT} WHERE status = ?1 AND courier_id IS NULL AND paid_at IS NOT NULL ORDER BY pickup_time"
    );
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(OrderStatus::Approved.as_str())
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Customer orders filtered to a status set (active or history view)
pub async fn for_customer(
    pool: &SqlitePool,
    customer_id: i64,
    statuses: &[OrderStatus],
) -> RepoResult<Vec<Order>> {
    // Status strings come from the enum, not from user input
    let list = statuses
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "{ORDER_SELECT} WHERE customer_id = ? AND status IN ({list}) ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(customer_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
