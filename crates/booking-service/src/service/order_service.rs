//! 下单服务
//!
//! 持久化订单后逐条扣减课程余位，返回逐条结果。
//!
//! ## 核心流程
//!
//! 1. 校验请求 -> 2. 写入订单（库存状态 pending）-> 3. 按请求顺序逐条扣减
//! 4. 汇总结果并标记库存状态（applied / partial）
//!
//! ## 一致性
//!
//! - 订单写入与库存扣减是两次独立写入，不做跨条目事务，也不回滚订单
//! - 每条扣减都是单次原子操作，不存在先读后写
//! - 宽松模式无条件扣减，余位可能变为负数；严格模式余位不足时拒绝该条

use std::sync::Arc;
use std::time::Instant;

use booking_shared::config::ConsistencyMode;
use booking_shared::observability::metrics;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::{BookingError, Result};
use crate::models::{
    InventoryStatus, ItemOutcome, ItemStatus, OrderItem, OrderRequest, OrderResult,
    PersistedOrder, parse_id,
};
use crate::repository::{CatalogStore, DecrementGuard, DecrementOutcome, OrderStore};

/// 下单服务
pub struct OrderService<O: OrderStore + ?Sized, C: CatalogStore + ?Sized> {
    orders: Arc<O>,
    catalog: Arc<C>,
    mode: ConsistencyMode,
}

impl<O: OrderStore + ?Sized, C: CatalogStore + ?Sized> OrderService<O, C> {
    pub fn new(orders: Arc<O>, catalog: Arc<C>, mode: ConsistencyMode) -> Self {
        Self {
            orders,
            catalog,
            mode,
        }
    }

    pub fn mode(&self) -> ConsistencyMode {
        self.mode
    }

    fn guard(&self) -> DecrementGuard {
        match self.mode {
            ConsistencyMode::Legacy => DecrementGuard::Unchecked,
            ConsistencyMode::Strict => DecrementGuard::RequireSufficient,
        }
    }

    /// 下单
    ///
    /// 订单写入成功后即返回成功，单条扣减失败只体现在逐条结果中
    #[instrument(skip(self, request), fields(mode = self.mode.as_str(), items = request.items.len()))]
    pub async fn place_order(&self, request: OrderRequest) -> Result<OrderResult> {
        let started = Instant::now();
        request.validate()?;

        let order = self.orders.insert(&request).await?;

        let mut item_outcomes = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let outcome = self.apply_item(order.id, item).await;
            metrics::record_order_item(outcome.status.as_str());
            item_outcomes.push(outcome);
        }

        let inventory_status = if item_outcomes.iter().all(|o| o.applied) {
            InventoryStatus::Applied
        } else {
            InventoryStatus::Partial
        };
        self.mark_inventory_status(order.id, inventory_status).await;

        let applied = item_outcomes.iter().filter(|o| o.applied).count();
        info!(
            order_id = %order.id,
            inventory_status = %inventory_status,
            applied,
            total = item_outcomes.len(),
            "订单已处理"
        );
        metrics::record_order_placed(
            self.mode.as_str(),
            inventory_status.as_str(),
            started.elapsed().as_secs_f64(),
        );

        Ok(OrderResult {
            order_id: order.id,
            inventory_status,
            item_outcomes,
        })
    }

    /// 扣减单条明细，错误归入该条结果
    async fn apply_item(&self, order_id: Uuid, item: &OrderItem) -> ItemOutcome {
        let lesson_id = match parse_id(&item.lesson_id) {
            Ok(id) => id,
            Err(_) => {
                warn!(%order_id, lesson_id = %item.lesson_id, "课程 ID 格式无效，跳过扣减");
                return ItemOutcome::new(item, ItemStatus::InvalidIdentifier, None);
            }
        };

        match self
            .catalog
            .decrement_spaces(lesson_id, item.qty, self.guard())
            .await
        {
            Ok(DecrementOutcome::Applied { remaining }) => {
                if remaining < 0 {
                    warn!(%order_id, %lesson_id, remaining, "课程余位已为负数");
                }
                ItemOutcome::new(item, ItemStatus::Applied, Some(remaining))
            }
            Ok(DecrementOutcome::NotFound) => {
                warn!(%order_id, %lesson_id, qty = item.qty, "课程不存在，跳过扣减");
                ItemOutcome::new(item, ItemStatus::NotFound, None)
            }
            Ok(DecrementOutcome::Insufficient { available }) => {
                info!(%order_id, %lesson_id, qty = item.qty, available, "课程余位不足");
                ItemOutcome::new(item, ItemStatus::InsufficientSpaces, Some(available))
            }
            Err(e) => {
                warn!(%order_id, %lesson_id, qty = item.qty, error = %e, "扣减课程余位失败");
                ItemOutcome::new(item, ItemStatus::StorageError, None)
            }
        }
    }

    /// 写入库存状态标记，失败只记录日志
    async fn mark_inventory_status(&self, order_id: Uuid, status: InventoryStatus) {
        match self.orders.set_inventory_status(order_id, status).await {
            Ok(true) => {}
            Ok(false) => warn!(%order_id, %status, "标记库存状态时订单不存在"),
            Err(e) => warn!(%order_id, %status, error = %e, "标记库存状态失败"),
        }
    }

    /// 按 ID 查询订单
    pub async fn get_order(&self, id: &str) -> Result<PersistedOrder> {
        let order_id = parse_id(id)?;
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| BookingError::not_found("Order", order_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersistedOrder;
    use crate::repository::{MockCatalogStore, MockOrderStore};

    fn request(items: Vec<OrderItem>) -> OrderRequest {
        OrderRequest {
            name: "Ada".to_string(),
            phone: "07700900123".to_string(),
            address: Some("1 Main St".to_string()),
            items,
        }
    }

    #[tokio::test]
    async fn test_insert_failure_skips_decrements() {
        let mut orders = MockOrderStore::new();
        orders
            .expect_insert()
            .times(1)
            .returning(|_| Err(BookingError::StorageUnavailable("connection refused".into())));
        orders.expect_set_inventory_status().never();

        let mut catalog = MockCatalogStore::new();
        catalog.expect_decrement_spaces().never();

        let service = OrderService::new(Arc::new(orders), Arc::new(catalog), ConsistencyMode::Legacy);
        let result = service
            .place_order(request(vec![OrderItem::new(Uuid::new_v4(), 1)]))
            .await;

        assert!(matches!(result, Err(BookingError::StorageUnavailable(_))));
    }

    #[tokio::test]
    async fn test_invalid_request_touches_no_store() {
        let mut orders = MockOrderStore::new();
        orders.expect_insert().never();
        let catalog = MockCatalogStore::new();

        let service = OrderService::new(Arc::new(orders), Arc::new(catalog), ConsistencyMode::Legacy);
        let mut req = request(vec![OrderItem::new(Uuid::new_v4(), 1)]);
        req.name = String::new();

        let result = service.place_order(req).await;
        assert!(matches!(result, Err(BookingError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_item_storage_error_continues_with_next_item() {
        let failing = Uuid::new_v4();
        let healthy = Uuid::new_v4();

        let mut orders = MockOrderStore::new();
        orders
            .expect_insert()
            .returning(|req| Ok(PersistedOrder::from_request(req)));
        orders
            .expect_set_inventory_status()
            .withf(|_, status| *status == InventoryStatus::Partial)
            .times(1)
            .returning(|_, _| Ok(true));

        let mut catalog = MockCatalogStore::new();
        catalog
            .expect_decrement_spaces()
            .withf(move |id, _, _| *id == failing)
            .returning(|_, _, _| Err(BookingError::StorageUnavailable("timeout".into())));
        catalog
            .expect_decrement_spaces()
            .withf(move |id, _, _| *id == healthy)
            .returning(|_, _, _| Ok(DecrementOutcome::Applied { remaining: 4 }));

        let service = OrderService::new(Arc::new(orders), Arc::new(catalog), ConsistencyMode::Legacy);
        let result = service
            .place_order(request(vec![
                OrderItem::new(failing, 1),
                OrderItem::new(healthy, 1),
            ]))
            .await
            .unwrap();

        assert_eq!(result.inventory_status, InventoryStatus::Partial);
        assert_eq!(result.item_outcomes[0].status, ItemStatus::StorageError);
        assert!(!result.item_outcomes[0].applied);
        assert_eq!(result.item_outcomes[1].status, ItemStatus::Applied);
        assert_eq!(result.item_outcomes[1].remaining_spaces, Some(4));
    }

    #[tokio::test]
    async fn test_marker_failure_is_not_surfaced() {
        let lesson = Uuid::new_v4();

        let mut orders = MockOrderStore::new();
        orders
            .expect_insert()
            .returning(|req| Ok(PersistedOrder::from_request(req)));
        orders
            .expect_set_inventory_status()
            .returning(|_, _| Err(BookingError::StorageUnavailable("gone".into())));

        let mut catalog = MockCatalogStore::new();
        catalog
            .expect_decrement_spaces()
            .returning(|_, _, _| Ok(DecrementOutcome::Applied { remaining: 0 }));

        let service = OrderService::new(Arc::new(orders), Arc::new(catalog), ConsistencyMode::Strict);
        let result = service
            .place_order(request(vec![OrderItem::new(lesson, 1)]))
            .await
            .unwrap();

        assert!(result.fully_applied());
        assert_eq!(result.inventory_status, InventoryStatus::Applied);
    }

    #[tokio::test]
    async fn test_mode_selects_decrement_guard() {
        let lesson = Uuid::new_v4();

        for (mode, expected) in [
            (ConsistencyMode::Legacy, DecrementGuard::Unchecked),
            (ConsistencyMode::Strict, DecrementGuard::RequireSufficient),
        ] {
            let mut orders = MockOrderStore::new();
            orders
                .expect_insert()
                .returning(|req| Ok(PersistedOrder::from_request(req)));
            orders.expect_set_inventory_status().returning(|_, _| Ok(true));

            let mut catalog = MockCatalogStore::new();
            catalog
                .expect_decrement_spaces()
                .withf(move |_, qty, guard| *qty == 2 && *guard == expected)
                .times(1)
                .returning(|_, _, _| Ok(DecrementOutcome::Applied { remaining: 1 }));

            let service = OrderService::new(Arc::new(orders), Arc::new(catalog), mode);
            service
                .place_order(request(vec![OrderItem::new(lesson, 2)]))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_get_order_malformed_id() {
        let service = OrderService::new(
            Arc::new(MockOrderStore::new()),
            Arc::new(MockCatalogStore::new()),
            ConsistencyMode::Legacy,
        );
        let result = service.get_order("order-1").await;
        assert!(matches!(result, Err(BookingError::InvalidIdentifier(_))));
    }
}
