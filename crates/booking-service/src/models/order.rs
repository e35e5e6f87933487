//! 订单相关实体定义
//!
//! 包含下单请求、持久化订单、逐条库存扣减结果

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// 订单明细
///
/// `lesson_id` 是对课程的弱引用，格式不合法时不在校验阶段拒绝，
/// 而是在逐条扣减时记为 `invalid_identifier`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub lesson_id: String,
    #[validate(range(min = 1, message = "购买数量必须大于 0"))]
    pub qty: i32,
}

impl OrderItem {
    pub fn new(lesson_id: impl ToString, qty: i32) -> Self {
        Self {
            lesson_id: lesson_id.to_string(),
            qty,
        }
    }
}

/// 下单请求
///
/// 同一课程重复出现在多条明细中时，每条独立扣减
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[validate(custom(function = "not_blank", message = "姓名不能为空"))]
    pub name: String,
    #[validate(custom(function = "not_blank", message = "电话不能为空"))]
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[validate(length(min = 1, message = "订单明细不能为空"), nested)]
    pub items: Vec<OrderItem>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// 订单的库存落地状态
///
/// 订单写入与库存扣减是两次独立写入，此状态显式标记两者之间的不一致窗口
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryStatus {
    /// 订单已写入，库存尚未处理
    #[default]
    Pending,
    /// 所有明细均已扣减
    Applied,
    /// 至少一条明细未扣减
    Partial,
}

impl InventoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Applied => "applied",
            Self::Partial => "partial",
        }
    }
}

impl fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InventoryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "applied" => Ok(Self::Applied),
            "partial" => Ok(Self::Partial),
            other => Err(format!("未知的库存状态: {}", other)),
        }
    }
}

/// 已持久化订单
///
/// 除 `inventory_status` 外创建后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedOrder {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub items: Vec<OrderItem>,
    pub inventory_status: InventoryStatus,
    pub created_at: DateTime<Utc>,
}

impl PersistedOrder {
    /// 由下单请求生成新订单记录
    pub fn from_request(request: &OrderRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: request.name.clone(),
            phone: request.phone.clone(),
            address: request.address.clone(),
            items: request.items.clone(),
            inventory_status: InventoryStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// 订单内容是否与请求一致（不含系统字段）
    pub fn matches_request(&self, request: &OrderRequest) -> bool {
        self.name == request.name
            && self.phone == request.phone
            && self.address == request.address
            && self.items == request.items
    }
}

/// 单条明细的扣减结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// 已扣减
    Applied,
    /// 课程不存在
    NotFound,
    /// 严格模式下余位不足，未扣减
    InsufficientSpaces,
    /// 课程 ID 格式不合法
    InvalidIdentifier,
    /// 扣减时存储层出错
    StorageError,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::NotFound => "not_found",
            Self::InsufficientSpaces => "insufficient_spaces",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::StorageError => "storage_error",
        }
    }
}

/// 明细扣减结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutcome {
    pub lesson_id: String,
    pub qty: i32,
    pub applied: bool,
    pub status: ItemStatus,
    /// 扣减后的剩余名额（仅在已扣减或余位不足时有值）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_spaces: Option<i32>,
}

impl ItemOutcome {
    pub fn new(item: &OrderItem, status: ItemStatus, remaining_spaces: Option<i32>) -> Self {
        Self {
            lesson_id: item.lesson_id.clone(),
            qty: item.qty,
            applied: status == ItemStatus::Applied,
            status,
            remaining_spaces,
        }
    }
}

/// 下单结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    pub order_id: Uuid,
    pub inventory_status: InventoryStatus,
    pub item_outcomes: Vec<ItemOutcome>,
}

impl OrderResult {
    /// 是否所有明细都已扣减
    pub fn fully_applied(&self) -> bool {
        self.item_outcomes.iter().all(|o| o.applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OrderRequest {
        OrderRequest {
            name: "Ada".to_string(),
            phone: "07700900123".to_string(),
            address: None,
            items: vec![OrderItem::new(Uuid::new_v4(), 2)],
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_empty_or_blank_name_rejected() {
        let mut req = request();
        req.name = String::new();
        assert!(req.validate().is_err());

        req.name = "   ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_empty_phone_rejected() {
        let mut req = request();
        req.phone = String::new();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
    }

    #[test]
    fn test_empty_items_rejected() {
        let mut req = request();
        req.items.clear();
        let errors = req.validate().unwrap_err();
        assert!(errors.to_string().contains("items"));
    }

    #[test]
    fn test_non_positive_qty_rejected() {
        let mut req = request();
        req.items.push(OrderItem::new("anything", 0));
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_malformed_lesson_id_not_rejected_by_validation() {
        let mut req = request();
        req.items.push(OrderItem::new("not-a-uuid", 1));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_order_request_deserialize_without_address() {
        let req: OrderRequest = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "phone": "123",
            "items": [{ "lessonId": "abc", "qty": 1 }]
        }))
        .unwrap();
        assert!(req.address.is_none());
        assert_eq!(req.items[0].lesson_id, "abc");
    }

    #[test]
    fn test_persisted_order_from_request() {
        let req = request();
        let order = PersistedOrder::from_request(&req);
        assert!(order.matches_request(&req));
        assert_eq!(order.inventory_status, InventoryStatus::Pending);
    }

    #[test]
    fn test_inventory_status_round_trip_text() {
        for status in [
            InventoryStatus::Pending,
            InventoryStatus::Applied,
            InventoryStatus::Partial,
        ] {
            assert_eq!(status.as_str().parse::<InventoryStatus>().unwrap(), status);
        }
        assert!("done".parse::<InventoryStatus>().is_err());
    }

    #[test]
    fn test_item_outcome_applied_flag_follows_status() {
        let item = OrderItem::new("x", 1);
        assert!(ItemOutcome::new(&item, ItemStatus::Applied, Some(4)).applied);
        assert!(!ItemOutcome::new(&item, ItemStatus::NotFound, None).applied);
        assert!(!ItemOutcome::new(&item, ItemStatus::InsufficientSpaces, Some(1)).applied);
    }

    #[test]
    fn test_item_status_serialization() {
        let json = serde_json::to_value(ItemStatus::InsufficientSpaces).unwrap();
        assert_eq!(json, "insufficient_spaces");
        assert_eq!(ItemStatus::InsufficientSpaces.as_str(), "insufficient_spaces");
    }
}
