//! End-to-end API test: checkout → payment → merchant approval → courier
//! delivery → receipt confirmation, over the HTTP router.

use axum::Router;
use axum::body::Body;
use feira_server::ServerState;
use feira_server::api;
use http::{Request, StatusCode, header};
use serde::Deserialize;
use serde_json::{Value, json};
use tower::ServiceExt;

#[derive(Debug, Deserialize)]
struct Envelope {
    code: String,
    #[allow(dead_code)]
    message: String,
    data: Option<Value>,
}

async fn test_app() -> Router {
    let state = ServerState::in_memory().await.unwrap();
    api::router(state)
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Envelope) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let envelope: Envelope = serde_json::from_slice(&bytes).unwrap();
    (status, envelope)
}

fn id_of(envelope: &Envelope) -> i64 {
    envelope.data.as_ref().unwrap()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let (status, envelope) = request(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope.code, "E0000");
}

#[tokio::test]
async fn test_full_order_lifecycle_over_http() {
    let app = test_app().await;

    // Register actors
    let (status, merchant) = request(
        &app,
        "POST",
        "/api/merchant",
        Some(json!({"name": "Banca do Zé", "stall": "B-14"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let merchant_id = id_of(&merchant);

    let (_, courier) = request(&app, "POST", "/api/courier", Some(json!({"name": "João"}))).await;
    let courier_id = id_of(&courier);

    // Checkout: 3 × R$2.00 + 1 × R$5.00 + R$5.00 fee
    let draft = json!({
        "customer_id": 1001,
        "lines": [
            {"merchant_id": merchant_id, "product_name": "Tomates", "quantity": 3, "unit_label": "kg", "unit_price": 2.0},
            {"merchant_id": merchant_id, "product_name": "Queijo", "quantity": 1, "unit_label": "un", "unit_price": 5.0}
        ],
        "pickup_entrance": "Portão 2",
        "pickup_time": 1893456000000i64,
        "payment_method": "PIX",
        "delivery_fee": 5.0
    });
    let (status, checkout) = request(&app, "POST", "/api/customer/orders", Some(draft)).await;
    assert_eq!(status, StatusCode::OK);
    let order = &checkout.data.as_ref().unwrap()["order"];
    let order_id = order["id"].as_i64().unwrap();
    assert_eq!(order["status"], "PENDING_PAYMENT");
    assert_eq!(order["subtotal"], 11.0);
    assert_eq!(order["total"], 16.0);

    // Pay (simulated); a second payment attempt conflicts
    let pay_uri = format!("/api/customer/orders/{order_id}/pay");
    let (status, paid) = request(&app, "POST", &pay_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid.data.as_ref().unwrap()["status"], "AWAITING_MERCHANT_APPROVAL");

    let (status, _) = request(&app, "POST", &pay_uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Merchant accepts both pending items
    let (status, pending) = request(
        &app,
        "GET",
        &format!("/api/merchant/{merchant_id}/pending-items"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = pending.data.as_ref().unwrap().as_array().unwrap().clone();
    assert_eq!(items.len(), 2);

    for item in &items {
        let item_id = item["id"].as_i64().unwrap();
        let (status, _) = request(
            &app,
            "POST",
            &format!("/api/merchant/items/{item_id}/decision"),
            Some(json!({"merchant_id": merchant_id, "decision": "ACCEPTED"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    // Order is on the pull list; courier claims, departs, arrives
    let (_, available) = request(&app, "GET", "/api/courier/available-orders", None).await;
    let listed = available.data.as_ref().unwrap().as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"].as_i64().unwrap(), order_id);

    let claim_body = json!({"courier_id": courier_id});
    let (status, _) = request(
        &app,
        "POST",
        &format!("/api/courier/orders/{order_id}/claim"),
        Some(claim_body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Claimed order is gone from the pull list
    let (_, available) = request(&app, "GET", "/api/courier/available-orders", None).await;
    assert!(available.data.as_ref().unwrap().as_array().unwrap().is_empty());

    let (status, en_route) = request(
        &app,
        "POST",
        &format!("/api/courier/orders/{order_id}/depart"),
        Some(claim_body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(en_route.data.as_ref().unwrap()["status"], "EN_ROUTE");

    let (status, _) = request(
        &app,
        "POST",
        &format!("/api/courier/orders/{order_id}/arrive"),
        Some(claim_body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Customer confirms receipt; courier wallet credited with the fee
    let (status, delivered) = request(
        &app,
        "POST",
        &format!("/api/customer/orders/{order_id}/confirm-delivery"),
        Some(json!({"customer_id": 1001})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(delivered.data.as_ref().unwrap()["status"], "DELIVERED");

    let (_, courier) = request(&app, "GET", &format!("/api/courier/{courier_id}"), None).await;
    assert_eq!(courier.data.as_ref().unwrap()["wallet_balance"], 5.0);
    assert_eq!(courier.data.as_ref().unwrap()["deliveries_count"], 1);

    // History view contains the delivered order
    let (_, history) = request(
        &app,
        "GET",
        "/api/customer/1001/orders?scope=history",
        None,
    )
    .await;
    let history_orders = history.data.as_ref().unwrap().as_array().unwrap();
    assert_eq!(history_orders.len(), 1);
    assert_eq!(history_orders[0]["status"], "DELIVERED");
}

#[tokio::test]
async fn test_validation_errors_map_to_400() {
    let app = test_app().await;

    let empty_cart = json!({
        "customer_id": 1001,
        "lines": [],
        "pickup_entrance": "Portão 2",
        "pickup_time": 1893456000000i64,
        "payment_method": "PIX",
        "delivery_fee": 5.0
    });
    let (status, envelope) = request(&app, "POST", "/api/customer/orders", Some(empty_cart)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(envelope.code, "E0002");
}

#[tokio::test]
async fn test_unknown_order_maps_to_404() {
    let app = test_app().await;
    let (status, envelope) = request(&app, "GET", "/api/customer/orders/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(envelope.code, "E0003");
}
