//! 服务层
//!
//! - `OrderService`: 下单与库存扣减
//! - `CatalogService`: 课程查询与编辑

mod catalog_service;
mod order_service;

pub use catalog_service::CatalogService;
pub use order_service::OrderService;
