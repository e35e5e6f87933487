//! 订单仓储
//!
//! 订单明细以 JSONB 整体存储，库存状态以文本存储：
//!
//! ```sql
//! CREATE TABLE orders (
//!     id               UUID PRIMARY KEY,
//!     name             TEXT NOT NULL,
//!     phone            TEXT NOT NULL,
//!     address          TEXT,
//!     items            JSONB NOT NULL,
//!     inventory_status VARCHAR(20) NOT NULL DEFAULT 'pending',
//!     created_at       TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use super::traits::OrderStore;
use crate::error::{BookingError, Result};
use crate::models::{InventoryStatus, OrderItem, OrderRequest, PersistedOrder};

#[derive(FromRow)]
struct OrderRow {
    id: Uuid,
    name: String,
    phone: String,
    address: Option<String>,
    items: Json<Vec<OrderItem>>,
    inventory_status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for PersistedOrder {
    type Error = BookingError;

    fn try_from(row: OrderRow) -> Result<Self> {
        let inventory_status = row
            .inventory_status
            .parse::<InventoryStatus>()
            .map_err(BookingError::Internal)?;

        Ok(Self {
            id: row.id,
            name: row.name,
            phone: row.phone,
            address: row.address,
            items: row.items.0,
            inventory_status,
            created_at: row.created_at,
        })
    }
}

/// 订单仓储
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    async fn insert(&self, request: &OrderRequest) -> Result<PersistedOrder> {
        let order = PersistedOrder::from_request(request);

        sqlx::query(
            r#"
            INSERT INTO orders (id, name, phone, address, items, inventory_status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(order.id)
        .bind(&order.name)
        .bind(&order.phone)
        .bind(&order.address)
        .bind(Json(&order.items))
        .bind(order.inventory_status.as_str())
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PersistedOrder>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, name, phone, address, items, inventory_status, created_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PersistedOrder::try_from).transpose()
    }

    async fn set_inventory_status(&self, id: Uuid, status: InventoryStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE orders SET inventory_status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
