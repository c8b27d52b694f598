/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/feira | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | STALE_UNPAID_TTL_MINUTES | 1440 | 未付款订单过期时间(分钟) |
/// | SWEEP_INTERVAL_SECONDS | 600 | 过期订单清扫间隔(秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/feira HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 未付款订单保留时长（分钟），超时被清扫为 CANCELLED
    pub stale_unpaid_ttl_minutes: i64,
    /// 清扫任务运行间隔（秒）
    pub sweep_interval_seconds: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/feira".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            stale_unpaid_ttl_minutes: std::env::var("STALE_UNPAID_TTL_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(24 * 60),
            sweep_interval_seconds: std::env::var("SWEEP_INTERVAL_SECONDS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(600),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// SQLite database file path under the work directory
    pub fn db_path(&self) -> String {
        format!("{}/feira.db", self.work_dir.trim_end_matches('/'))
    }

    /// Stale-order TTL in milliseconds
    pub fn stale_unpaid_ttl_ms(&self) -> i64 {
        self.stale_unpaid_ttl_minutes * 60 * 1000
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
