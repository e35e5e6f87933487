//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use booking_service::{CatalogService, CatalogStore, ConsistencyMode, OrderService, OrderStore};
use booking_shared::database::Database;

/// 以 trait object 注入存储的下单服务
pub type SharedOrderService = OrderService<dyn OrderStore, dyn CatalogStore>;
/// 以 trait object 注入存储的课程目录服务
pub type SharedCatalogService = CatalogService<dyn CatalogStore>;

/// Axum 应用共享状态
///
/// 服务通过 Arc 在 handler 间共享；数据库句柄仅用于就绪探针，内存存储时为空
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<SharedOrderService>,
    pub catalog: Arc<SharedCatalogService>,
    pub database: Option<Database>,
}

impl AppState {
    pub fn new(
        order_store: Arc<dyn OrderStore>,
        catalog_store: Arc<dyn CatalogStore>,
        mode: ConsistencyMode,
    ) -> Self {
        Self {
            orders: Arc::new(OrderService::new(order_store, catalog_store.clone(), mode)),
            catalog: Arc::new(CatalogService::new(catalog_store)),
            database: None,
        }
    }

    /// 关联数据库连接（就绪探针使用）
    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }
}
