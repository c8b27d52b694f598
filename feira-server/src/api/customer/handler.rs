//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};
use shared::models::{Order, OrderDetail};
use shared::order::{DraftOrder, OrderScope};

/// Checkout: turn the client-held draft into a persisted order
pub async fn checkout(
    State(state): State<ServerState>,
    Json(draft): Json<DraftOrder>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let detail = state.orders.create_order(draft).await?;
    Ok(ok(detail))
}

/// Simulated payment confirmation
pub async fn pay(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.mark_paid(id).await?;
    Ok(ok(order))
}

/// Confirm-delivery request
#[derive(Debug, Deserialize)]
pub struct ConfirmDeliveryRequest {
    pub customer_id: i64,
}

/// Customer confirms receipt, closing the order
pub async fn confirm_delivery(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ConfirmDeliveryRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.confirm_delivery(id, payload.customer_id).await?;
    Ok(ok(order))
}

/// Query params for listing a customer's orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub scope: OrderScope,
}

/// Active or history view of a customer's orders
pub async fn list_orders(
    State(state): State<ServerState>,
    Path(customer_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = state
        .orders
        .list_customer_orders(customer_id, query.scope)
        .await?;
    Ok(ok(orders))
}

/// Order detail (order + line items)
pub async fn get_order(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let detail = state.orders.get_order_detail(id).await?;
    Ok(ok(detail))
}
