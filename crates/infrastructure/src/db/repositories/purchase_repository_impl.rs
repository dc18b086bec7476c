//! 购买Repository实现

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    DomainError, DomainResult, Pagination, Purchase, PurchaseRepository, PurchaseStatistics,
    PurchaseStatus,
};
use sqlx::{query, query_as, FromRow, Row};
use uuid::Uuid;

use crate::db::DbPool;

/// 数据库购买模型
#[derive(Debug, Clone, FromRow)]
struct DbPurchase {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub amount_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<DbPurchase> for Purchase {
    fn from(db: DbPurchase) -> Self {
        Purchase {
            id: db.id,
            user_id: db.user_id,
            content_id: db.content_id,
            amount_cents: db.amount_cents,
            status: PurchaseStatus::from_str(&db.status).unwrap_or(PurchaseStatus::Pending),
            created_at: db.created_at,
            completed_at: db.completed_at,
        }
    }
}

const PURCHASE_COLUMNS: &str =
    "id, user_id, content_id, amount_cents, status, created_at, completed_at";

/// 购买Repository实现
pub struct PgPurchaseRepository {
    pool: Arc<DbPool>,
}

impl PgPurchaseRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PurchaseRepository for PgPurchaseRepository {
    async fn create(&self, purchase: &Purchase) -> DomainResult<Purchase> {
        let result = query_as::<_, DbPurchase>(&format!(
            r#"
            INSERT INTO purchases (id, user_id, content_id, amount_cents, status, created_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PURCHASE_COLUMNS
        ))
        .bind(purchase.id)
        .bind(purchase.user_id)
        .bind(purchase.content_id)
        .bind(purchase.amount_cents)
        .bind(purchase.status.as_str())
        .bind(purchase.created_at)
        .bind(purchase.completed_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(result.into())
    }

    async fn find_completed(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> DomainResult<Option<Purchase>> {
        let result = query_as::<_, DbPurchase>(&format!(
            "SELECT {} FROM purchases \
             WHERE user_id = $1 AND content_id = $2 AND status = 'completed'",
            PURCHASE_COLUMNS
        ))
        .bind(user_id)
        .bind(content_id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(result.map(Purchase::from))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        pagination: &Pagination,
    ) -> DomainResult<(Vec<Purchase>, u64)> {
        let total: i64 = query("SELECT COUNT(*) FROM purchases WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| DomainError::database_error(e.to_string()))?
            .get(0);

        let rows = query_as::<_, DbPurchase>(&format!(
            "SELECT {} FROM purchases WHERE user_id = $1 \
             ORDER BY created_at DESC, id ASC LIMIT {} OFFSET {}",
            PURCHASE_COLUMNS, pagination.limit, pagination.offset
        ))
        .bind(user_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok((rows.into_iter().map(Purchase::from).collect(), total as u64))
    }

    async fn statistics(&self) -> DomainResult<PurchaseStatistics> {
        let row = query(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'completed') as total_purchases,
                COALESCE(SUM(amount_cents) FILTER (WHERE status = 'completed'), 0) as revenue_cents
            FROM purchases
            "#,
        )
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(PurchaseStatistics {
            total_purchases: row.get::<i64, _>("total_purchases") as u64,
            revenue_cents: row.get::<i64, _>("revenue_cents"),
        })
    }
}
