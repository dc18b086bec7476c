//! 播放进度Repository实现

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{DomainError, DomainResult, PlaybackProgress, ProgressRepository};
use sqlx::{query_as, FromRow};
use uuid::Uuid;

use crate::db::DbPool;

#[derive(Debug, Clone, FromRow)]
struct DbProgress {
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub position_seconds: i32,
    pub duration_seconds: i32,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<DbProgress> for PlaybackProgress {
    fn from(db: DbProgress) -> Self {
        PlaybackProgress {
            user_id: db.user_id,
            content_id: db.content_id,
            position_seconds: db.position_seconds.max(0) as u32,
            duration_seconds: db.duration_seconds.max(0) as u32,
            completed: db.completed,
            updated_at: db.updated_at,
        }
    }
}

const PROGRESS_COLUMNS: &str =
    "user_id, content_id, position_seconds, duration_seconds, completed, updated_at";

/// 播放进度Repository实现
pub struct PgProgressRepository {
    pool: Arc<DbPool>,
}

impl PgProgressRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressRepository for PgProgressRepository {
    async fn upsert(&self, progress: &PlaybackProgress) -> DomainResult<PlaybackProgress> {
        let result = query_as::<_, DbProgress>(&format!(
            r#"
            INSERT INTO playback_progress
                (user_id, content_id, position_seconds, duration_seconds, completed, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, content_id) DO UPDATE
            SET position_seconds = EXCLUDED.position_seconds,
                duration_seconds = EXCLUDED.duration_seconds,
                completed = playback_progress.completed OR EXCLUDED.completed,
                updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            PROGRESS_COLUMNS
        ))
        .bind(progress.user_id)
        .bind(progress.content_id)
        .bind(progress.position_seconds as i32)
        .bind(progress.duration_seconds as i32)
        .bind(progress.completed)
        .bind(progress.updated_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(result.into())
    }

    async fn find(
        &self,
        user_id: Uuid,
        content_id: Uuid,
    ) -> DomainResult<Option<PlaybackProgress>> {
        let result = query_as::<_, DbProgress>(&format!(
            "SELECT {} FROM playback_progress WHERE user_id = $1 AND content_id = $2",
            PROGRESS_COLUMNS
        ))
        .bind(user_id)
        .bind(content_id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(result.map(PlaybackProgress::from))
    }

    async fn list_by_user(&self, user_id: Uuid) -> DomainResult<Vec<PlaybackProgress>> {
        let rows = query_as::<_, DbProgress>(&format!(
            "SELECT {} FROM playback_progress WHERE user_id = $1 ORDER BY updated_at DESC",
            PROGRESS_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(rows.into_iter().map(PlaybackProgress::from).collect())
    }
}
