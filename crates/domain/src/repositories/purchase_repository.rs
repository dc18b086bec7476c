//! 购买Repository接口

use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::Pagination;
use crate::entities::purchase::Purchase;
use crate::errors::DomainResult;

/// 购买统计
#[derive(Debug, Clone, Default)]
pub struct PurchaseStatistics {
    pub total_purchases: u64,
    pub revenue_cents: i64,
}

#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    async fn create(&self, purchase: &Purchase) -> DomainResult<Purchase>;

    /// 查询用户对某内容的已完成购买（访问判定和防重复购买）
    async fn find_completed(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> DomainResult<Option<Purchase>>;

    async fn list_by_user(
        &self,
        user_id: Uuid,
        pagination: &Pagination,
    ) -> DomainResult<(Vec<Purchase>, u64)>;

    async fn statistics(&self) -> DomainResult<PurchaseStatistics>;
}
