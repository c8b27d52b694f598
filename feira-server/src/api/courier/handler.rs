//! Courier API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::courier as courier_repo;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{Courier, CourierCreate, Order};

/// Register a courier
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<CourierCreate>,
) -> AppResult<Json<AppResponse<Courier>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let courier = courier_repo::create(&state.db.pool, payload).await?;
    Ok(ok(courier))
}

/// Courier profile (incl. wallet balance and delivery count)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(courier_id): Path<i64>,
) -> AppResult<Json<AppResponse<Courier>>> {
    let courier = courier_repo::find_by_id(&state.db.pool, courier_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Courier {courier_id} not found")))?;
    Ok(ok(courier))
}

/// Availability toggle request
#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub available: bool,
}

/// Toggle the courier's availability flag
pub async fn set_availability(
    State(state): State<ServerState>,
    Path(courier_id): Path<i64>,
    Json(payload): Json<AvailabilityRequest>,
) -> AppResult<Json<AppResponse<Courier>>> {
    courier_repo::set_available(&state.db.pool, courier_id, payload.available).await?;
    let courier = courier_repo::find_by_id(&state.db.pool, courier_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Courier {courier_id} not found")))?;
    Ok(ok(courier))
}

/// The pull list: approved, unassigned, paid orders
pub async fn available_orders(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = state.orders.list_available_orders_for_courier().await?;
    Ok(ok(orders))
}

/// Courier-identified request body
#[derive(Debug, Deserialize)]
pub struct CourierActionRequest {
    pub courier_id: i64,
}

/// First-claim-wins: take ownership of an available order
pub async fn claim(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CourierActionRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state
        .orders
        .claim_order_for_delivery(id, payload.courier_id)
        .await?;
    Ok(ok(order))
}

/// Depart with the claimed order (EN_ROUTE)
pub async fn depart(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CourierActionRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.mark_en_route(id, payload.courier_id).await?;
    Ok(ok(order))
}

/// Hand off and wait for the customer (AWAITING_RECEIPT_CONFIRMATION)
pub async fn arrive(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CourierActionRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state
        .orders
        .mark_awaiting_confirmation(id, payload.courier_id)
        .await?;
    Ok(ok(order))
}
