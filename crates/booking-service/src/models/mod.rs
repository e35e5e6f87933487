//! 预订服务领域模型
//!
//! 包含课程目录与订单的核心实体定义

pub mod lesson;
pub mod order;

pub use lesson::{Lesson, LessonPatch};
pub use order::{
    InventoryStatus, ItemOutcome, ItemStatus, OrderItem, OrderRequest, OrderResult,
    PersistedOrder,
};

use uuid::Uuid;

use crate::error::{BookingError, Result};

/// 解析记录 ID，格式不合法时返回 `InvalidIdentifier`
pub fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| BookingError::InvalidIdentifier(raw.to_string()))
}
