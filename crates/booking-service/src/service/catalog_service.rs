//! 课程目录服务
//!
//! 课程列表、搜索、查询和局部更新

use std::sync::Arc;

use tracing::{info, instrument};
use validator::Validate;

use crate::error::{BookingError, Result};
use crate::models::{Lesson, LessonPatch, parse_id};
use crate::repository::CatalogStore;

/// 课程目录服务
pub struct CatalogService<C: CatalogStore + ?Sized> {
    catalog: Arc<C>,
}

impl<C: CatalogStore + ?Sized> CatalogService<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }

    /// 列出全部课程
    pub async fn list_all(&self) -> Result<Vec<Lesson>> {
        self.catalog.find_all().await
    }

    /// 按关键字搜索
    ///
    /// 忽略大小写匹配科目、地点、价格和余位，空关键字返回全部课程
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Lesson>> {
        if query.is_empty() {
            return self.catalog.find_all().await;
        }
        self.catalog.find_matching(query).await
    }

    pub async fn get(&self, id: &str) -> Result<Lesson> {
        let lesson_id = parse_id(id)?;
        self.catalog
            .find_by_id(lesson_id)
            .await?
            .ok_or_else(|| BookingError::not_found("Lesson", lesson_id))
    }

    /// 局部更新课程
    ///
    /// ID 合法但无匹配课程时返回 `Ok(false)`，目录不变
    #[instrument(skip(self, patch))]
    pub async fn update_entry(&self, id: &str, patch: LessonPatch) -> Result<bool> {
        let lesson_id = parse_id(id)?;
        if patch.is_empty() {
            return Err(BookingError::InvalidRequest("没有需要更新的字段".to_string()));
        }
        patch.validate()?;

        let matched = self.catalog.update(lesson_id, &patch).await?;
        info!(%lesson_id, matched, "课程更新");
        Ok(matched > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCatalogStore;

    #[tokio::test]
    async fn test_empty_search_lists_all() {
        let mut catalog = MockCatalogStore::new();
        catalog
            .expect_find_all()
            .times(1)
            .returning(|| Ok(vec![Lesson::new("Math", "Hendon", 100.0, 5)]));
        catalog.expect_find_matching().never();

        let service = CatalogService::new(Arc::new(catalog));
        assert_eq!(service.search("").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_entry_rejects_before_touching_store() {
        let mut catalog = MockCatalogStore::new();
        catalog.expect_update().never();
        let service = CatalogService::new(Arc::new(catalog));

        let malformed = service
            .update_entry("abc", LessonPatch {
                spaces: Some(1),
                ..Default::default()
            })
            .await;
        assert!(matches!(malformed, Err(BookingError::InvalidIdentifier(_))));

        let id = uuid::Uuid::new_v4().to_string();
        let empty = service.update_entry(&id, LessonPatch::default()).await;
        assert!(matches!(empty, Err(BookingError::InvalidRequest(_))));

        let negative = service
            .update_entry(&id, LessonPatch {
                spaces: Some(-3),
                ..Default::default()
            })
            .await;
        assert!(matches!(negative, Err(BookingError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let mut catalog = MockCatalogStore::new();
        catalog
            .expect_find_all()
            .returning(|| Err(BookingError::StorageUnavailable("down".into())));

        let service = CatalogService::new(Arc::new(catalog));
        assert!(matches!(
            service.list_all().await,
            Err(BookingError::StorageUnavailable(_))
        ));
    }
}
