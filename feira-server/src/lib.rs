//! Feira Server - 市场订单生命周期服务
//!
//! # 架构概述
//!
//! 本模块是 Feira 服务端的主入口，提供以下核心功能：
//!
//! - **订单生命周期** (`orders`): 订单/商品状态机、汇总推导、配送认领
//! - **数据库** (`db`): 嵌入式 SQLite 存储 (sqlx, WAL)
//! - **HTTP API** (`api`): 顾客/摊主/配送员接口
//!
//! # 模块结构
//!
//! ```text
//! feira-server/src/
//! ├── core/          # 配置、状态、后台任务、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── orders/        # 订单生命周期管理
//! ├── db/            # 数据库层
//! └── utils/         # 错误、校验、日志
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use crate::db::DbService;
pub use crate::orders::{OrderError, OrdersManager};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ______     _
   / ____/__  (_)________ _
  / /_  / _ \/ / ___/ __ `/
 / __/ /  __/ / /  / /_/ /
/_/    \___/_/_/   \__,_/
    "#
    );
}
