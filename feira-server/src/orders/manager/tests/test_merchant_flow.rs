use super::*;
use shared::order::LineItemStatus;

#[tokio::test]
async fn test_items_not_actionable_before_payment() {
    let manager = test_manager().await;
    let m = add_merchant(&manager, "Banca do Zé").await;
    let detail = manager
        .create_order(draft(vec![line(m, "Tomates", 1, 2.0)]))
        .await
        .unwrap();

    // Not in the work queue while unpaid
    let pending = manager.list_merchant_pending_items(m).await.unwrap();
    assert!(pending.is_empty());

    // Decisions are guard failures while unpaid
    let result = manager
        .set_line_item_status(detail.items[0].id, m, ItemDecision::Accepted)
        .await;
    assert!(matches!(result, Err(OrderError::Conflict(_))));
}

#[tokio::test]
async fn test_pending_view_lists_only_own_paid_items() {
    let manager = test_manager().await;
    let m1 = add_merchant(&manager, "Banca A").await;
    let m2 = add_merchant(&manager, "Banca B").await;

    let detail = manager
        .create_order(draft(vec![
            line(m1, "Alface", 2, 3.0),
            line(m2, "Ovos", 1, 12.0),
        ]))
        .await
        .unwrap();
    manager.mark_paid(detail.order.id).await.unwrap();

    let for_m1 = manager.list_merchant_pending_items(m1).await.unwrap();
    assert_eq!(for_m1.len(), 1);
    assert_eq!(for_m1[0].product_name, "Alface");
    assert_eq!(for_m1[0].order_id, detail.order.id);

    let for_m2 = manager.list_merchant_pending_items(m2).await.unwrap();
    assert_eq!(for_m2.len(), 1);
    assert_eq!(for_m2[0].product_name, "Ovos");
}

#[tokio::test]
async fn test_accept_all_items_approves_order() {
    let manager = test_manager().await;
    let m = add_merchant(&manager, "Banca do Zé").await;
    let detail = paid_order(&manager, m).await;

    // Accept first item: order must NOT advance yet
    manager
        .set_line_item_status(detail.items[0].id, m, ItemDecision::Accepted)
        .await
        .unwrap();
    let mid = manager.get_order_detail(detail.order.id).await.unwrap();
    assert_eq!(mid.order.status, OrderStatus::AwaitingMerchantApproval);

    // Accept second item: rollup advances the order
    manager
        .set_line_item_status(detail.items[1].id, m, ItemDecision::Accepted)
        .await
        .unwrap();
    let after = manager.get_order_detail(detail.order.id).await.unwrap();
    assert_eq!(after.order.status, OrderStatus::Approved);

    // Now visible on the courier pull list
    let available = manager.list_available_orders_for_courier().await.unwrap();
    assert!(available.iter().any(|o| o.id == detail.order.id));

    // Merchant revenue accrued: 3×2.00 + 1×5.00
    let merchant = merchant_repo::find_by_id(&manager.pool, m)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(merchant.revenue_total, 11.0);
}

#[tokio::test]
async fn test_rollup_never_advances_while_items_pending() {
    let manager = test_manager().await;
    let m = add_merchant(&manager, "Banca do Zé").await;
    let detail = paid_order(&manager, m).await;

    manager
        .set_line_item_status(detail.items[0].id, m, ItemDecision::Accepted)
        .await
        .unwrap();

    let after = manager.get_order_detail(detail.order.id).await.unwrap();
    assert_eq!(after.order.status, OrderStatus::AwaitingMerchantApproval);

    let available = manager.list_available_orders_for_courier().await.unwrap();
    assert!(available.is_empty());
}

#[tokio::test]
async fn test_mixed_accept_reject_stays_awaiting() {
    // Current behavior: a mixed outcome has no defined order-level state and
    // the order stays awaiting approval (see DESIGN.md).
    let manager = test_manager().await;
    let m = add_merchant(&manager, "Banca do Zé").await;
    let detail = paid_order(&manager, m).await;

    manager
        .set_line_item_status(detail.items[0].id, m, ItemDecision::Accepted)
        .await
        .unwrap();
    manager
        .set_line_item_status(detail.items[1].id, m, ItemDecision::Rejected)
        .await
        .unwrap();

    let after = manager.get_order_detail(detail.order.id).await.unwrap();
    assert_eq!(after.order.status, OrderStatus::AwaitingMerchantApproval);
    assert_eq!(after.items[0].status, LineItemStatus::Accepted);
    assert_eq!(after.items[1].status, LineItemStatus::Rejected);

    // Not on the pull list either
    let available = manager.list_available_orders_for_courier().await.unwrap();
    assert!(available.is_empty());
}

#[tokio::test]
async fn test_all_rejected_moves_order_to_rejected() {
    let manager = test_manager().await;
    let m = add_merchant(&manager, "Banca do Zé").await;
    let detail = paid_order(&manager, m).await;

    for item in &detail.items {
        manager
            .set_line_item_status(item.id, m, ItemDecision::Rejected)
            .await
            .unwrap();
    }

    let after = manager.get_order_detail(detail.order.id).await.unwrap();
    assert_eq!(after.order.status, OrderStatus::Rejected);

    // Terminal: shows up in the customer history view
    let history = manager
        .list_customer_orders(CUSTOMER, OrderScope::History)
        .await
        .unwrap();
    assert!(history.iter().any(|o| o.id == detail.order.id));

    // No revenue accrued for rejected items
    let merchant = merchant_repo::find_by_id(&manager.pool, m)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(merchant.revenue_total, 0.0);
}

#[tokio::test]
async fn test_ownership_guard_hides_foreign_items() {
    let manager = test_manager().await;
    let m1 = add_merchant(&manager, "Banca A").await;
    let m2 = add_merchant(&manager, "Banca B").await;
    let detail = paid_order(&manager, m1).await;

    let result = manager
        .set_line_item_status(detail.items[0].id, m2, ItemDecision::Accepted)
        .await;
    assert!(matches!(result, Err(OrderError::NotFound(_))));

    // Item unchanged
    let after = manager.get_order_detail(detail.order.id).await.unwrap();
    assert_eq!(after.items[0].status, LineItemStatus::Pending);
}

#[tokio::test]
async fn test_double_decision_is_conflict() {
    let manager = test_manager().await;
    let m = add_merchant(&manager, "Banca do Zé").await;
    let detail = paid_order(&manager, m).await;

    manager
        .set_line_item_status(detail.items[0].id, m, ItemDecision::Accepted)
        .await
        .unwrap();
    let again = manager
        .set_line_item_status(detail.items[0].id, m, ItemDecision::Rejected)
        .await;
    assert!(matches!(again, Err(OrderError::Conflict(_))));

    // First decision stands, revenue accrued exactly once
    let after = manager.get_order_detail(detail.order.id).await.unwrap();
    assert_eq!(after.items[0].status, LineItemStatus::Accepted);
    let merchant = merchant_repo::find_by_id(&manager.pool, m)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(merchant.revenue_total, after.items[0].line_total);
}

#[tokio::test]
async fn test_unknown_item_not_found() {
    let manager = test_manager().await;
    let m = add_merchant(&manager, "Banca do Zé").await;
    let result = manager
        .set_line_item_status(123_456, m, ItemDecision::Accepted)
        .await;
    assert!(matches!(result, Err(OrderError::NotFound(_))));
}
