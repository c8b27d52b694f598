//! Lifecycle manager tests
//!
//! Run against an in-memory SQLite store with the real migrations applied.

use crate::db::DbService;
use crate::db::repository::{courier as courier_repo, merchant as merchant_repo};
use crate::orders::manager::{OrderError, OrdersManager};
use shared::models::{CourierCreate, MerchantCreate, OrderDetail};
use shared::order::{DraftLine, DraftOrder, ItemDecision, OrderScope, OrderStatus};

mod test_merchant_flow;

const CUSTOMER: i64 = 1001;
const DELIVERY_FEE: f64 = 5.0;

async fn test_manager() -> OrdersManager {
    let db = DbService::in_memory().await.unwrap();
    OrdersManager::new(&db)
}

async fn add_merchant(manager: &OrdersManager, name: &str) -> i64 {
    merchant_repo::create(
        &manager.pool,
        MerchantCreate {
            name: name.to_string(),
            stall: "B-14".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn add_courier(manager: &OrdersManager, name: &str) -> i64 {
    courier_repo::create(
        &manager.pool,
        CourierCreate {
            name: name.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn line(merchant_id: i64, product_name: &str, quantity: i32, unit_price: f64) -> DraftLine {
    DraftLine {
        merchant_id,
        product_name: product_name.to_string(),
        quantity,
        unit_label: "un".to_string(),
        unit_price,
    }
}

fn draft(lines: Vec<DraftLine>) -> DraftOrder {
    DraftOrder {
        customer_id: CUSTOMER,
        lines,
        pickup_entrance: "Portão 2".to_string(),
        pickup_time: 1_893_456_000_000,
        payment_method: "PIX".to_string(),
        delivery_fee: DELIVERY_FEE,
    }
}

/// Checkout and pay an order with two lines from one merchant
async fn paid_order(manager: &OrdersManager, merchant_id: i64) -> OrderDetail {
    let detail = manager
        .create_order(draft(vec![
            line(merchant_id, "Tomates", 3, 2.0),
            line(merchant_id, "Queijo", 1, 5.0),
        ]))
        .await
        .unwrap();
    manager.mark_paid(detail.order.id).await.unwrap();
    manager.get_order_detail(detail.order.id).await.unwrap()
}

/// Checkout, pay, and accept every item: an order ready for the pull list
async fn approved_order(manager: &OrdersManager, merchant_id: i64) -> OrderDetail {
    let detail = paid_order(manager, merchant_id).await;
    for item in &detail.items {
        manager
            .set_line_item_status(item.id, merchant_id, ItemDecision::Accepted)
            .await
            .unwrap();
    }
    manager.get_order_detail(detail.order.id).await.unwrap()
}
