//! Customer API Module
//!
//! Checkout, simulated payment confirmation, receipt confirmation, and the
//! customer's active/history order views.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Customer router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/customer", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/orders", post(handler::checkout))
        .route("/orders/{id}", get(handler::get_order))
        .route("/orders/{id}/pay", post(handler::pay))
        .route("/orders/{id}/confirm-delivery", post(handler::confirm_delivery))
        .route("/{customer_id}/orders", get(handler::list_orders))
}
