//! 分类Repository接口

use async_trait::async_trait;

use crate::entities::category::Category;
use crate::errors::DomainResult;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: &Category) -> DomainResult<Category>;

    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Category>>;

    async fn list_all(&self) -> DomainResult<Vec<Category>>;
}
