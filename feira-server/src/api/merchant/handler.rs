//! Merchant API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::merchant as merchant_repo;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{Merchant, MerchantCreate, OrderLineItem, PendingItem};
use shared::order::ItemDecision;

/// Register a stallholder
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<MerchantCreate>,
) -> AppResult<Json<AppResponse<Merchant>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.stall, "stall", MAX_SHORT_TEXT_LEN)?;

    let merchant = merchant_repo::create(&state.db.pool, payload).await?;
    Ok(ok(merchant))
}

/// Merchant profile (incl. accrued revenue)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(merchant_id): Path<i64>,
) -> AppResult<Json<AppResponse<Merchant>>> {
    let merchant = merchant_repo::find_by_id(&state.db.pool, merchant_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Merchant {merchant_id} not found")))?;
    Ok(ok(merchant))
}

/// The merchant's work queue: undecided items on paid orders
pub async fn pending_items(
    State(state): State<ServerState>,
    Path(merchant_id): Path<i64>,
) -> AppResult<Json<AppResponse<Vec<PendingItem>>>> {
    let items = state.orders.list_merchant_pending_items(merchant_id).await?;
    Ok(ok(items))
}

/// Item decision request
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub merchant_id: i64,
    pub decision: ItemDecision,
}

/// Accept or reject one pending line item
pub async fn decide_item(
    State(state): State<ServerState>,
    Path(item_id): Path<i64>,
    Json(payload): Json<DecisionRequest>,
) -> AppResult<Json<AppResponse<OrderLineItem>>> {
    let item = state
        .orders
        .set_line_item_status(item_id, payload.merchant_id, payload.decision)
        .await?;
    Ok(ok(item))
}
