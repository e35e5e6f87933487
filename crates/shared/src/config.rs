//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。
//! 数据库连接参数单独存放在属性文件中，见 [`crate::db_properties`]。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::observability::ObservabilityConfig;

/// 数据库连接池配置
///
/// 连接串本身不在这里配置，而是从 `properties_file` 指向的属性文件组装
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub properties_file: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            properties_file: "config/db.properties".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_seconds: 30,
            idle_timeout_seconds: 600,
        }
    }
}

/// 服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// 下单时库存扣减的一致性模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsistencyMode {
    /// 无下限检查，直接 `spaces = spaces - qty`，可能出现负库存
    #[default]
    Legacy,
    /// 条件扣减 `spaces >= qty`，不满足时拒绝该明细
    Strict,
}

impl ConsistencyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Strict => "strict",
        }
    }
}

/// 订单配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrdersConfig {
    pub consistency: ConsistencyMode,
}

/// HTTP 外围配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 静态资源目录（课程图片等），挂载在 `/images`
    pub static_dir: String,
    /// 允许的 CORS 来源，逗号分隔；`*` 表示全部放行
    pub cors_origins: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            static_dir: "static".to_string(),
            cors_origins: "*".to_string(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub orders: OrdersConfig,
    pub http: HttpConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（BOOKING_ 前缀，层级用双下划线，如 BOOKING_ORDERS__CONSISTENCY -> orders.consistency）
    /// 5. 服务特定端口环境变量（如 BOOKING_API_PORT）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("BOOKING_ENV").unwrap_or_else(|_| "development".to_string());

        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            )
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", service_name)))
                    .required(false),
            )
            // 字段名本身含单下划线（max_connections），层级分隔必须用双下划线
            .add_source(
                Environment::with_prefix("BOOKING")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        if let Some(port) = Self::get_service_port_from_env(service_name) {
            config.server.port = port;
        }

        Ok(config)
    }

    /// 从环境变量获取服务特定端口
    ///
    /// 服务名到环境变量的映射规则：
    /// - booking-api -> BOOKING_API_PORT
    /// - 其他服务：大写下划线格式 + _PORT
    fn get_service_port_from_env(service_name: &str) -> Option<u16> {
        let env_var_name = match service_name {
            "booking-api" => "BOOKING_API_PORT".to_string(),
            _ => format!("{}_PORT", service_name.to_uppercase().replace('-', "_")),
        };

        std::env::var(env_var_name)
            .ok()
            .and_then(|v| v.parse().ok())
    }

    /// 获取服务地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
