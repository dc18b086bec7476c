//! 播放进度Repository接口

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::progress::PlaybackProgress;
use crate::errors::DomainResult;

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// 按 (用户, 内容) 覆盖写入进度
    async fn upsert(&self, progress: &PlaybackProgress) -> DomainResult<PlaybackProgress>;

    async fn find(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> DomainResult<Option<PlaybackProgress>>;

    async fn list_by_user(&self, user_id: Uuid) -> DomainResult<Vec<PlaybackProgress>>;
}
