//! 播放进度实体
//!
//! 按 (用户, 内容) 维护一条进度记录，播放端定期上报后覆盖更新。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 达到该比例视为已完成
const COMPLETION_THRESHOLD: f64 = 0.95;

/// 播放进度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackProgress {
    pub user_id: Uuid,
    pub content_id: Uuid,
    /// 当前播放位置（秒）
    pub position_seconds: u32,
    /// 媒体总时长（秒）
    pub duration_seconds: u32,
    /// 是否已完成
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl PlaybackProgress {
    /// 记录一次进度上报
    ///
    /// 位置超出总时长时截断到总时长；达到总时长 95% 即视为已完成。
    pub fn record(
        user_id: Uuid,
        content_id: Uuid,
        position_seconds: u32,
        duration_seconds: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let position = position_seconds.min(duration_seconds);
        let completed = duration_seconds > 0
            && position as f64 >= duration_seconds as f64 * COMPLETION_THRESHOLD;

        Self {
            user_id,
            content_id,
            position_seconds: position,
            duration_seconds,
            completed,
            updated_at: now,
        }
    }

    /// 应用新的上报，完成标记只进不退
    pub fn update(&mut self, position_seconds: u32, duration_seconds: u32, now: DateTime<Utc>) {
        let next = Self::record(
            self.user_id,
            self.content_id,
            position_seconds,
            duration_seconds,
            now,
        );
        self.position_seconds = next.position_seconds;
        self.duration_seconds = next.duration_seconds;
        self.completed = self.completed || next.completed;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_clamped_to_duration() {
        let progress =
            PlaybackProgress::record(Uuid::new_v4(), Uuid::new_v4(), 900, 600, Utc::now());
        assert_eq!(progress.position_seconds, 600);
        assert!(progress.completed);
    }

    #[test]
    fn test_completion_threshold() {
        let user = Uuid::new_v4();
        let content = Uuid::new_v4();

        let halfway = PlaybackProgress::record(user, content, 300, 600, Utc::now());
        assert!(!halfway.completed);

        let almost = PlaybackProgress::record(user, content, 570, 600, Utc::now());
        assert!(almost.completed);
    }

    #[test]
    fn test_zero_duration_never_completes() {
        let progress = PlaybackProgress::record(Uuid::new_v4(), Uuid::new_v4(), 0, 0, Utc::now());
        assert!(!progress.completed);
    }

    #[test]
    fn test_completed_flag_sticks() {
        let mut progress =
            PlaybackProgress::record(Uuid::new_v4(), Uuid::new_v4(), 580, 600, Utc::now());
        assert!(progress.completed);

        // 回看到开头不清除完成标记
        progress.update(10, 600, Utc::now());
        assert!(progress.completed);
        assert_eq!(progress.position_seconds, 10);
    }
}
