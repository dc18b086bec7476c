//! 内容Repository接口

use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::{ContentSort, Pagination, Predicate};
use crate::entities::content::Content;
use crate::errors::DomainResult;

/// 内容目录统计
#[derive(Debug, Clone, Default)]
pub struct ContentStatistics {
    pub total: u64,
    pub published: u64,
    pub draft: u64,
    pub archived: u64,
}

/// 内容Repository
///
/// search 在一次调用内以同一谓词集读取当前页数据和总数，
/// 返回 (items, total)。调用之间不提供一致性保证。
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// 按谓词列表查询内容，返回当前页数据和匹配总数
    async fn search(
        &self,
        predicates: &[Predicate],
        sort: ContentSort,
        pagination: &Pagination,
    ) -> DomainResult<(Vec<Content>, u64)>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Content>>;

    /// 按 slug 查询已发布内容（详情页使用）
    async fn find_published_by_slug(&self, slug: &str) -> DomainResult<Option<Content>>;

    async fn slug_exists(&self, slug: &str) -> DomainResult<bool>;

    async fn create(&self, content: &Content) -> DomainResult<Content>;

    async fn update(&self, content: &Content) -> DomainResult<Content>;

    async fn delete(&self, id: Uuid) -> DomainResult<bool>;

    /// 管理端列表，包含草稿和已下架内容
    async fn list_all(&self, pagination: &Pagination) -> DomainResult<(Vec<Content>, u64)>;

    /// 购买完成后递增购买数
    async fn increment_purchase_count(&self, id: Uuid) -> DomainResult<()>;

    /// 设置内容的分类关联（全量替换）
    async fn set_categories(&self, content_id: Uuid, category_ids: &[Uuid]) -> DomainResult<()>;

    async fn statistics(&self) -> DomainResult<ContentStatistics>;
}
