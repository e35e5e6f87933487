//! 存储层
//!
//! 提供课程目录与订单的数据访问接口，封装 SQL 操作细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 名额扣减是单条原子操作，前置条件由调用方通过 [`DecrementGuard`] 指定
//! - 定义 trait 接口以支持 mock 测试与内存实现

mod lesson_repo;
mod memory_store;
mod order_repo;
mod traits;

pub use lesson_repo::PgCatalogStore;
pub use memory_store::{MemoryCatalogStore, MemoryOrderStore, MemoryStore};
pub use order_repo::PgOrderStore;
pub use traits::*;
