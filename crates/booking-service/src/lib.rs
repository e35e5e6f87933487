//! 课程预订核心服务
//!
//! 提供课程目录查询、库存编辑和下单扣减库存等核心功能。
//!
//! ## 核心功能
//!
//! - **课程查询**：列出全部课程，按关键字（科目、地点、价格、余位）模糊搜索
//! - **课程编辑**：按 ID 局部更新课程字段
//! - **下单**：校验订单、持久化订单、逐条扣减课程余位并返回逐条结果
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `repository`: 存储层（PostgreSQL 与内存实现）
//! - `service`: 业务服务层

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use booking_shared::config::ConsistencyMode;
pub use error::{BookingError, Result};
pub use models::*;
pub use repository::{
    CatalogStore, DecrementGuard, DecrementOutcome, MemoryCatalogStore, MemoryOrderStore,
    OrderStore, PgCatalogStore, PgOrderStore,
};
pub use service::{CatalogService, OrderService};
