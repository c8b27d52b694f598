//! Courier API Module
//!
//! Courier registration, the pull list of available orders, and the
//! claim → depart → arrive delivery flow.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Courier router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/courier", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::register))
        .route("/{courier_id}", get(handler::get_by_id))
        .route("/{courier_id}/availability", post(handler::set_availability))
        .route("/available-orders", get(handler::available_orders))
        .route("/orders/{id}/claim", post(handler::claim))
        .route("/orders/{id}/depart", post(handler::depart))
        .route("/orders/{id}/arrive", post(handler::arrive))
}
