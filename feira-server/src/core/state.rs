//! Shared server state

use crate::core::{BackgroundTasks, Config, TaskKind};
use crate::db::DbService;
use crate::orders::OrdersManager;
use crate::utils::AppError;
use std::time::Duration;

/// Application state shared across handlers and background tasks
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub orders: OrdersManager,
}

impl ServerState {
    /// Open the database and wire up the lifecycle manager
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;
        let db = DbService::new(&config.db_path()).await?;
        let orders = OrdersManager::new(&db);
        Ok(Self {
            config: config.clone(),
            db,
            orders,
        })
    }

    /// State over an in-memory database (tests and demos)
    pub async fn in_memory() -> Result<Self, AppError> {
        let db = DbService::in_memory().await?;
        let orders = OrdersManager::new(&db);
        Ok(Self {
            config: Config::with_overrides("/tmp/feira-test", 0),
            db,
            orders,
        })
    }

    /// Register background tasks and return the running task set
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        // 过期未付款订单清扫
        let token = tasks.shutdown_token();
        let orders = self.orders.clone();
        let ttl_ms = self.config.stale_unpaid_ttl_ms();
        let interval = Duration::from_secs(self.config.sweep_interval_seconds);
        tasks.spawn("stale_order_sweeper", TaskKind::Periodic, async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {
                        if let Err(e) = orders.cancel_stale_unpaid(ttl_ms).await {
                            tracing::error!(error = %e, "Stale order sweep failed");
                        }
                    }
                }
            }
        });

        tracing::info!(count = tasks.len(), "Background tasks started");
        tasks
    }
}
