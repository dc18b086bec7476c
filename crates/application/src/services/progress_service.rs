//! 播放进度服务
//!
//! 上报前校验内容可访问性：免费内容直接放行，付费内容要求
//! 已完成的购买记录。

use std::sync::Arc;

use domain::{
    ContentRepository, DomainError, PlaybackProgress, ProgressRepository, PurchaseRepository,
};
use uuid::Uuid;

use crate::{clock::Clock, dto::ProgressDto, error::ApplicationError};

#[derive(Debug, Clone)]
pub struct RecordProgressRequest {
    pub content_id: Uuid,
    pub position_seconds: u32,
    pub duration_seconds: u32,
}

pub struct ProgressServiceDependencies {
    pub progress_repository: Arc<dyn ProgressRepository>,
    pub content_repository: Arc<dyn ContentRepository>,
    pub purchase_repository: Arc<dyn PurchaseRepository>,
    pub clock: Arc<dyn Clock>,
}

pub struct ProgressService {
    deps: ProgressServiceDependencies,
}

impl ProgressService {
    pub fn new(deps: ProgressServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn record(
        &self,
        user_id: Uuid,
        request: RecordProgressRequest,
    ) -> Result<ProgressDto, ApplicationError> {
        let content = self
            .deps
            .content_repository
            .find_by_id(request.content_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::Domain(DomainError::resource_not_found(
                    "content",
                    request.content_id.to_string(),
                ))
            })?;

        if !content.is_free {
            let purchased = self
                .deps
                .purchase_repository
                .find_completed(user_id, content.id)
                .await?
                .is_some();
            if !purchased {
                return Err(ApplicationError::Authorization);
            }
        }

        let now = self.deps.clock.now();
        let progress = match self
            .deps
            .progress_repository
            .find(user_id, content.id)
            .await?
        {
            Some(mut existing) => {
                existing.update(request.position_seconds, request.duration_seconds, now);
                existing
            }
            None => PlaybackProgress::record(
                user_id,
                content.id,
                request.position_seconds,
                request.duration_seconds,
                now,
            ),
        };

        let stored = self.deps.progress_repository.upsert(&progress).await?;
        Ok(ProgressDto::from(stored))
    }

    pub async fn get(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<Option<ProgressDto>, ApplicationError> {
        let progress = self.deps.progress_repository.find(user_id, content_id).await?;
        Ok(progress.map(ProgressDto::from))
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<ProgressDto>, ApplicationError> {
        let entries = self.deps.progress_repository.list_by_user(user_id).await?;
        Ok(entries.into_iter().map(ProgressDto::from).collect())
    }
}
