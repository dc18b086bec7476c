//! 购买服务
//!
//! 购买流程：免费内容以 0 金额直接完成；付费内容按标价落一条
//! 已完成记录并递增内容购买数。重复购买同一内容被拒绝，
//! 只有已发布的内容可购买。

use std::sync::Arc;

use domain::{
    ContentRepository, DomainError, PageInfo, Pagination, Purchase, PurchaseRepository,
};
use uuid::Uuid;

use crate::{clock::Clock, dto::PurchaseDto, error::ApplicationError};

pub struct PurchaseServiceDependencies {
    pub purchase_repository: Arc<dyn PurchaseRepository>,
    pub content_repository: Arc<dyn ContentRepository>,
    pub clock: Arc<dyn Clock>,
}

pub struct PurchaseService {
    deps: PurchaseServiceDependencies,
}

impl PurchaseService {
    pub fn new(deps: PurchaseServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn purchase(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<PurchaseDto, ApplicationError> {
        let content = self
            .deps
            .content_repository
            .find_by_id(content_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::Domain(DomainError::resource_not_found(
                    "content",
                    content_id.to_string(),
                ))
            })?;

        if !content.is_published() {
            return Err(ApplicationError::Domain(
                DomainError::business_rule_violation("只能购买已发布的内容"),
            ));
        }

        if self
            .deps
            .purchase_repository
            .find_completed(user_id, content_id)
            .await?
            .is_some()
        {
            return Err(ApplicationError::Domain(
                DomainError::resource_already_exists("purchase", content_id.to_string()),
            ));
        }

        let amount_cents = if content.is_free { 0 } else { content.price_cents };
        let now = self.deps.clock.now();
        let purchase = Purchase::completed(user_id, content_id, amount_cents, now)?;

        let stored = self.deps.purchase_repository.create(&purchase).await?;
        self.deps
            .content_repository
            .increment_purchase_count(content_id)
            .await?;

        tracing::info!(user_id = %user_id, content_id = %content_id, amount_cents, "购买完成");
        Ok(PurchaseDto::from(stored))
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        pagination: &Pagination,
    ) -> Result<(Vec<PurchaseDto>, PageInfo), ApplicationError> {
        let (purchases, total) = self
            .deps
            .purchase_repository
            .list_by_user(user_id, pagination)
            .await?;

        let page_info = PageInfo::compute(pagination.page, pagination.page_size, total);
        Ok((
            purchases.into_iter().map(PurchaseDto::from).collect(),
            page_info,
        ))
    }

    /// 访问判定：免费内容对所有人开放，付费内容需要已完成的购买记录
    pub async fn user_has_access(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<bool, ApplicationError> {
        let content = self.deps.content_repository.find_by_id(content_id).await?;
        let Some(content) = content else {
            return Ok(false);
        };

        if content.is_free {
            return Ok(true);
        }

        Ok(self
            .deps
            .purchase_repository
            .find_completed(user_id, content_id)
            .await?
            .is_some())
    }
}
