//! 课程仓储
//!
//! 基于 PostgreSQL `lessons` 表的课程目录存储：
//!
//! ```sql
//! CREATE TABLE lessons (
//!     id       UUID PRIMARY KEY,
//!     subject  TEXT NOT NULL,
//!     location TEXT NOT NULL,
//!     price    DOUBLE PRECISION NOT NULL,
//!     spaces   INTEGER NOT NULL,
//!     image    TEXT
//! );
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::traits::{CatalogStore, DecrementGuard, DecrementOutcome};
use crate::error::Result;
use crate::models::{Lesson, LessonPatch};

/// 课程仓储
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 插入课程（目录维护和测试数据准备用）
    pub async fn insert(&self, lesson: &Lesson) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO lessons (id, subject, location, price, spaces, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(lesson.id)
        .bind(&lesson.subject)
        .bind(&lesson.location)
        .bind(lesson.price)
        .bind(lesson.spaces)
        .bind(&lesson.image)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// 转义 LIKE 通配符，使搜索词按字面子串匹配
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lesson>> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, subject, location, price, spaces, image
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lesson)
    }

    async fn find_all(&self) -> Result<Vec<Lesson>> {
        let lessons = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, subject, location, price, spaces, image
            FROM lessons
            ORDER BY subject ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(lessons)
    }

    #[instrument(skip(self))]
    async fn find_matching(&self, query: &str) -> Result<Vec<Lesson>> {
        let lessons = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, subject, location, price, spaces, image
            FROM lessons
            WHERE subject ILIKE $1
               OR location ILIKE $1
               OR price::text ILIKE $1
               OR spaces::text ILIKE $1
            ORDER BY subject ASC, id ASC
            "#,
        )
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await?;

        Ok(lessons)
    }

    /// 单条 UPDATE 完成检查和扣减，不存在先读后写的竞态窗口。
    /// 未更新时再查一次余位，仅用于区分"不存在"和"余位不足"。
    #[instrument(skip(self))]
    async fn decrement_spaces(
        &self,
        id: Uuid,
        qty: i32,
        guard: DecrementGuard,
    ) -> Result<DecrementOutcome> {
        let require_sufficient = guard == DecrementGuard::RequireSufficient;

        let remaining: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE lessons
            SET spaces = spaces - $2
            WHERE id = $1 AND (NOT $3 OR spaces >= $2)
            RETURNING spaces
            "#,
        )
        .bind(id)
        .bind(qty)
        .bind(require_sufficient)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(remaining) = remaining {
            return Ok(DecrementOutcome::Applied { remaining });
        }

        let available: Option<i32> = sqlx::query_scalar("SELECT spaces FROM lessons WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match available {
            Some(available) => DecrementOutcome::Insufficient { available },
            None => DecrementOutcome::NotFound,
        })
    }

    async fn update(&self, id: Uuid, patch: &LessonPatch) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE lessons
            SET
                subject = COALESCE($2, subject),
                location = COALESCE($3, location),
                price = COALESCE($4, price),
                spaces = COALESCE($5, spaces),
                image = COALESCE($6, image)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&patch.subject)
        .bind(&patch.location)
        .bind(patch.price)
        .bind(patch.spaces)
        .bind(&patch.image)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("math"), "%math%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\"), "%c:\\\\%");
    }
}
