//! 课程预订 HTTP 服务
//!
//! 启动顺序：配置 -> 可观测性 -> 数据库 -> 存储 -> 服务 -> 路由

use std::sync::Arc;

use booking_api::{routes, state::AppState};
use booking_service::{PgCatalogStore, PgOrderStore};
use booking_shared::{
    config::AppConfig, database::Database, db_properties::DbProperties, observability,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在时忽略
    dotenvy::dotenv().ok();

    let config = AppConfig::load("booking-api")?;

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!(
        environment = %config.environment,
        consistency = config.orders.consistency.as_str(),
        "Starting booking-api on {}",
        config.server_addr()
    );

    // 连接参数来自独立的属性文件，缺少必需项时直接退出
    let properties = DbProperties::load(&config.database.properties_file)?;

    let db = Database::connect(&config.database, &properties.connection_url()).await?;

    let order_store = Arc::new(PgOrderStore::new(db.pool().clone()));
    let catalog_store = Arc::new(PgCatalogStore::new(db.pool().clone()));
    let state = AppState::new(order_store, catalog_store, config.orders.consistency)
        .with_database(db.clone());

    if config.is_production() && config.http.cors_origins.trim() == "*" {
        warn!("http.cors_origins=\"*\" 在生产环境中不安全，请设置为具体域名");
    }

    let app = routes::build_router(state, &config.http);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 收到 SIGTERM 或 Ctrl+C 后停止接收新连接，等待已有请求处理完毕
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");

    Ok(())
}

/// 监听关闭信号
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "注册 Ctrl+C 处理器失败");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "注册 SIGTERM 处理器失败");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
