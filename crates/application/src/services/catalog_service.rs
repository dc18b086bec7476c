//! 目录查询服务
//!
//! 把请求作用域的过滤参数翻译为谓词列表并执行目录查询，
//! 返回带分页元信息的结果信封。查询失败在此边界被吸收为
//! 软失败信封，不向调用方传播。

use std::sync::Arc;

use domain::{CategoryRepository, ContentFilter, ContentRepository, PageInfo};

use crate::{
    dto::{CategoryDto, ContentDto, ContentPage},
    error::ApplicationError,
};

/// 查询失败时返回给用户的固定文案
pub const QUERY_FAILURE_MESSAGE: &str = "内容加载失败，请稍后再试";

pub struct CatalogServiceDependencies {
    pub content_repository: Arc<dyn ContentRepository>,
    pub category_repository: Arc<dyn CategoryRepository>,
}

pub struct CatalogService {
    deps: CatalogServiceDependencies,
}

impl CatalogService {
    pub fn new(deps: CatalogServiceDependencies) -> Self {
        Self { deps }
    }

    /// 按过滤条件浏览目录
    ///
    /// 只读操作；同一过滤条件在目录未变化时返回相同结果。
    /// 任何仓储错误都被转换为 success=false 的信封并记录日志。
    pub async fn browse(&self, filter: &ContentFilter) -> ContentPage {
        let predicates = filter.predicates();
        let sort = filter.sort();
        let pagination = filter.pagination();

        match self
            .deps
            .content_repository
            .search(&predicates, sort, &pagination)
            .await
        {
            Ok((items, total)) => {
                let pagination = PageInfo::compute(pagination.page, pagination.page_size, total);
                let data = items.into_iter().map(ContentDto::from).collect();
                ContentPage::ok(data, pagination)
            }
            Err(err) => {
                tracing::error!(error = %err, "目录查询失败");
                ContentPage::failure(QUERY_FAILURE_MESSAGE)
            }
        }
    }

    /// 详情页按 slug 查询已发布内容
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<ContentDto>, ApplicationError> {
        let content = self.deps.content_repository.find_published_by_slug(slug).await?;
        Ok(content.map(ContentDto::from))
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryDto>, ApplicationError> {
        let categories = self.deps.category_repository.list_all().await?;
        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }
}
