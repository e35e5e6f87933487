//! 存储 Trait 定义
//!
//! 定义订单存储与课程目录存储接口，服务层依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{InventoryStatus, Lesson, LessonPatch, OrderRequest, PersistedOrder};

/// 扣减名额时的前置条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecrementGuard {
    /// 无条件扣减，允许余位变为负数
    Unchecked,
    /// 仅当 `spaces >= qty` 时扣减
    RequireSufficient,
}

/// 单条扣减的存储层结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// 已扣减，附扣减后余位
    Applied { remaining: i32 },
    /// 无匹配课程
    NotFound,
    /// 前置条件不满足，未扣减
    Insufficient { available: i32 },
}

/// 订单存储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// 写入新订单，返回带系统字段（ID、创建时间）的记录
    async fn insert(&self, request: &OrderRequest) -> Result<PersistedOrder>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PersistedOrder>>;
    /// 更新库存落地状态，返回是否匹配到订单
    async fn set_inventory_status(&self, id: Uuid, status: InventoryStatus) -> Result<bool>;
}

/// 课程目录存储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lesson>>;
    async fn find_all(&self) -> Result<Vec<Lesson>>;
    /// 按搜索词匹配，语义同 [`Lesson::matches`]
    async fn find_matching(&self, query: &str) -> Result<Vec<Lesson>>;

    /// 以单次原子操作扣减名额
    async fn decrement_spaces(
        &self,
        id: Uuid,
        qty: i32,
        guard: DecrementGuard,
    ) -> Result<DecrementOutcome>;

    /// 局部更新，返回匹配到的记录数
    async fn update(&self, id: Uuid, patch: &LessonPatch) -> Result<u64>;
}
