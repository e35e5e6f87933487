//! 内存存储
//!
//! 使用 DashMap 实现的高并发内存存储，适用于测试和无数据库的本地开发。
//! 名额扣减在条目写锁内完成，与数据库实现的单语句条件更新语义一致。

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use super::traits::{CatalogStore, DecrementGuard, DecrementOutcome, OrderStore};
use crate::error::{BookingError, Result};
use crate::models::{InventoryStatus, Lesson, LessonPatch, OrderRequest, PersistedOrder};

/// 通用内存存储
///
/// 克隆后共享同一份数据
#[derive(Debug)]
pub struct MemoryStore<T> {
    data: Arc<DashMap<Uuid, T>>,
}

impl<T: Clone> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    /// 插入或覆盖
    pub fn insert(&self, id: Uuid, value: T) {
        self.data.insert(id, value);
    }

    /// 获取数据的克隆，不持有锁
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.get(id).map(|v| v.clone())
    }

    /// 在条目写锁内修改数据，返回闭包结果；不存在时返回 None
    pub fn update<R, F>(&self, id: &Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.data.get_mut(id).map(|mut entry| f(entry.value_mut()))
    }

    pub fn list(&self) -> Vec<T> {
        self.data.iter().map(|entry| entry.value().clone()).collect()
    }

    /// 按条件筛选
    pub fn list_by<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.data
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }
}

impl<T: Clone> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

/// 与数据库查询一致的排序：科目，其次 ID
fn catalog_order(a: &Lesson, b: &Lesson) -> Ordering {
    a.subject.cmp(&b.subject).then_with(|| a.id.cmp(&b.id))
}

/// 内存课程目录
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    lessons: MemoryStore<Lesson>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由课程列表构建目录
    pub fn with_lessons(lessons: impl IntoIterator<Item = Lesson>) -> Self {
        let store = Self::new();
        for lesson in lessons {
            store.insert(lesson);
        }
        store
    }

    pub fn insert(&self, lesson: Lesson) {
        self.lessons.insert(lesson.id, lesson);
    }

    pub fn get(&self, id: Uuid) -> Option<Lesson> {
        self.lessons.get(&id)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lesson>> {
        Ok(self.lessons.get(&id))
    }

    async fn find_all(&self) -> Result<Vec<Lesson>> {
        let mut lessons = self.lessons.list();
        lessons.sort_by(catalog_order);
        Ok(lessons)
    }

    async fn find_matching(&self, query: &str) -> Result<Vec<Lesson>> {
        let mut lessons = self.lessons.list_by(|lesson| lesson.matches(query));
        lessons.sort_by(catalog_order);
        Ok(lessons)
    }

    async fn decrement_spaces(
        &self,
        id: Uuid,
        qty: i32,
        guard: DecrementGuard,
    ) -> Result<DecrementOutcome> {
        let outcome = self.lessons.update(&id, |lesson| {
            if guard == DecrementGuard::RequireSufficient && lesson.spaces < qty {
                return Ok(DecrementOutcome::Insufficient {
                    available: lesson.spaces,
                });
            }
            // 与数据库 INTEGER 列一致：越界报存储错误，不回绕
            let remaining = lesson.spaces.checked_sub(qty).ok_or_else(|| {
                BookingError::StorageUnavailable(format!(
                    "integer out of range: {} - {}",
                    lesson.spaces, qty
                ))
            })?;
            lesson.spaces = remaining;
            Ok(DecrementOutcome::Applied { remaining })
        });

        outcome.unwrap_or(Ok(DecrementOutcome::NotFound))
    }

    async fn update(&self, id: Uuid, patch: &LessonPatch) -> Result<u64> {
        let matched = self.lessons.update(&id, |lesson| patch.apply_to(lesson));
        Ok(u64::from(matched.is_some()))
    }
}

/// 内存订单存储
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
    orders: MemoryStore<PersistedOrder>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.orders.count()
    }

    pub fn list(&self) -> Vec<PersistedOrder> {
        self.orders.list()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert(&self, request: &OrderRequest) -> Result<PersistedOrder> {
        let order = PersistedOrder::from_request(request);
        self.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PersistedOrder>> {
        Ok(self.orders.get(&id))
    }

    async fn set_inventory_status(&self, id: Uuid, status: InventoryStatus) -> Result<bool> {
        Ok(self
            .orders
            .update(&id, |order| order.inventory_status = status)
            .is_some())
    }
}
