//! Merchant API Module
//!
//! Stallholder registration, the pending work queue, and item decisions.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Merchant router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/merchant", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::register))
        .route("/{merchant_id}", get(handler::get_by_id))
        .route("/{merchant_id}/pending-items", get(handler::pending_items))
        .route("/items/{item_id}/decision", post(handler::decide_item))
}
