//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`customer`] - 顾客接口 (结算、付款、收货确认、订单查询)
//! - [`merchant`] - 摊主接口 (待处理商品、接受/拒绝)
//! - [`courier`] - 配送员接口 (可接订单、认领、配送流转)
//!
//! Actor identity arrives as explicit ids in path or body; authentication
//! is handled by an external collaborator.

pub mod courier;
pub mod customer;
pub mod health;
pub mod merchant;

use crate::core::ServerState;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Assemble the full API router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(customer::router())
        .merge(merchant::router())
        .merge(courier::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
