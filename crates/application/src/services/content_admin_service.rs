//! 管理端内容维护服务
//!
//! 草稿创建、编辑、发布、下架、删除和运营统计。
//! 调用方的 manage_content 权限由路由守卫和权限表保证，
//! 服务本身只实现内容生命周期规则。

use std::sync::Arc;

use domain::{
    CategoryRepository, Content, ContentRepository, ContentType, Difficulty, DomainError,
    PageInfo, Pagination, PurchaseRepository, UserRepository,
};
use uuid::Uuid;

use crate::{
    clock::Clock,
    dto::{ContentDto, PlatformStatsDto},
    error::ApplicationError,
};

#[derive(Debug, Clone)]
pub struct CreateContentRequest {
    pub slug: String,
    pub title: String,
    pub content_type: ContentType,
    pub difficulty: Difficulty,
    pub price_cents: i64,
    pub excerpt: Option<String>,
    pub description: Option<String>,
    pub category_slugs: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateContentRequest {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
}

pub struct ContentAdminServiceDependencies {
    pub content_repository: Arc<dyn ContentRepository>,
    pub category_repository: Arc<dyn CategoryRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub purchase_repository: Arc<dyn PurchaseRepository>,
    pub clock: Arc<dyn Clock>,
}

pub struct ContentAdminService {
    deps: ContentAdminServiceDependencies,
}

impl ContentAdminService {
    pub fn new(deps: ContentAdminServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn create(
        &self,
        request: CreateContentRequest,
    ) -> Result<ContentDto, ApplicationError> {
        if self.deps.content_repository.slug_exists(&request.slug).await? {
            return Err(ApplicationError::Domain(
                DomainError::resource_already_exists("content", &request.slug),
            ));
        }

        let now = self.deps.clock.now();
        let mut content = Content::new_draft(
            request.slug,
            request.title,
            request.content_type,
            request.difficulty,
            request.price_cents,
            now,
        )?;
        content.update_details(None, request.excerpt, request.description, now)?;

        let stored = self.deps.content_repository.create(&content).await?;

        if !request.category_slugs.is_empty() {
            let mut category_ids = Vec::with_capacity(request.category_slugs.len());
            for slug in &request.category_slugs {
                let category = self
                    .deps
                    .category_repository
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| {
                        ApplicationError::Domain(DomainError::resource_not_found(
                            "category",
                            slug.clone(),
                        ))
                    })?;
                category_ids.push(category.id);
            }
            self.deps
                .content_repository
                .set_categories(stored.id, &category_ids)
                .await?;
        }

        tracing::info!(content_id = %stored.id, slug = %stored.slug, "创建内容草稿");
        Ok(ContentDto::from(stored))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateContentRequest,
    ) -> Result<ContentDto, ApplicationError> {
        let mut content = self.require(id).await?;
        let now = self.deps.clock.now();

        content.update_details(request.title, request.excerpt, request.description, now)?;
        if let Some(price_cents) = request.price_cents {
            content.update_price(price_cents, now)?;
        }

        let stored = self.deps.content_repository.update(&content).await?;
        Ok(ContentDto::from(stored))
    }

    pub async fn publish(&self, id: Uuid) -> Result<ContentDto, ApplicationError> {
        let mut content = self.require(id).await?;
        content.publish(self.deps.clock.now())?;
        let stored = self.deps.content_repository.update(&content).await?;

        tracing::info!(content_id = %stored.id, "发布内容");
        Ok(ContentDto::from(stored))
    }

    pub async fn archive(&self, id: Uuid) -> Result<ContentDto, ApplicationError> {
        let mut content = self.require(id).await?;
        content.archive(self.deps.clock.now());
        let stored = self.deps.content_repository.update(&content).await?;

        tracing::info!(content_id = %stored.id, "下架内容");
        Ok(ContentDto::from(stored))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApplicationError> {
        let deleted = self.deps.content_repository.delete(id).await?;
        if !deleted {
            return Err(ApplicationError::Domain(DomainError::resource_not_found(
                "content",
                id.to_string(),
            )));
        }
        tracing::info!(content_id = %id, "删除内容");
        Ok(())
    }

    /// 管理端列表，包含草稿和已下架内容
    pub async fn list(
        &self,
        pagination: &Pagination,
    ) -> Result<(Vec<ContentDto>, PageInfo), ApplicationError> {
        let (items, total) = self.deps.content_repository.list_all(pagination).await?;
        let page_info = PageInfo::compute(pagination.page, pagination.page_size, total);
        Ok((items.into_iter().map(ContentDto::from).collect(), page_info))
    }

    pub async fn stats(&self) -> Result<PlatformStatsDto, ApplicationError> {
        let content = self.deps.content_repository.statistics().await?;
        let users = self.deps.user_repository.statistics().await?;
        let purchases = self.deps.purchase_repository.statistics().await?;

        Ok(PlatformStatsDto {
            total_users: users.total_users,
            active_users: users.active_users,
            admin_users: users.admin_users,
            total_content: content.total,
            published_content: content.published,
            draft_content: content.draft,
            archived_content: content.archived,
            total_purchases: purchases.total_purchases,
            revenue_cents: purchases.revenue_cents,
        })
    }

    async fn require(&self, id: Uuid) -> Result<Content, ApplicationError> {
        self.deps
            .content_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                ApplicationError::Domain(DomainError::resource_not_found(
                    "content",
                    id.to_string(),
                ))
            })
    }
}
