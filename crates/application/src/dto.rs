//! 对外数据传输对象
//!
//! DTO 与领域实体分离，承担对外 JSON 字段命名（camelCase）和
//! 敏感字段裁剪。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::{
    Category, Content, ContentStatus, ContentType, Difficulty, PlaybackProgress, Purchase, Role,
    User,
};

pub use domain::PageInfo;

/// 目录条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDto {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub description: Option<String>,
    pub content_type: ContentType,
    pub difficulty: Difficulty,
    pub status: ContentStatus,
    pub is_free: bool,
    pub price_cents: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub rating: f64,
    pub purchase_count: i64,
}

impl From<Content> for ContentDto {
    fn from(content: Content) -> Self {
        Self {
            id: content.id,
            slug: content.slug,
            title: content.title,
            excerpt: content.excerpt,
            description: content.description,
            content_type: content.content_type,
            difficulty: content.difficulty,
            status: content.status,
            is_free: content.is_free,
            price_cents: content.price_cents,
            published_at: content.published_at,
            rating: content.rating,
            purchase_count: content.purchase_count,
        }
    }
}

/// 目录查询结果信封
///
/// 软失败语义：查询失败时 success=false、data 为空、error 为固定
/// 文案、分页复位；调用方永远拿到一个定义良好的输出形状。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPage {
    pub success: bool,
    pub data: Vec<ContentDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub pagination: PageInfo,
}

impl ContentPage {
    pub fn ok(data: Vec<ContentDto>, pagination: PageInfo) -> Self {
        Self {
            success: true,
            data,
            error: None,
            pagination,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            error: Some(message.into()),
            pagination: PageInfo::reset(),
        }
    }
}

/// 用户信息（不含密码哈希）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

/// 分类信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDto {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            slug: category.slug,
            name: category.name,
        }
    }
}

/// 购买记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDto {
    pub id: Uuid,
    pub content_id: Uuid,
    pub amount_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Purchase> for PurchaseDto {
    fn from(purchase: Purchase) -> Self {
        Self {
            id: purchase.id,
            content_id: purchase.content_id,
            amount_cents: purchase.amount_cents,
            status: purchase.status.as_str().to_string(),
            created_at: purchase.created_at,
        }
    }
}

/// 播放进度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDto {
    pub content_id: Uuid,
    pub position_seconds: u32,
    pub duration_seconds: u32,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<PlaybackProgress> for ProgressDto {
    fn from(progress: PlaybackProgress) -> Self {
        Self {
            content_id: progress.content_id,
            position_seconds: progress.position_seconds,
            duration_seconds: progress.duration_seconds,
            completed: progress.completed,
            updated_at: progress.updated_at,
        }
    }
}

/// 平台运营统计（管理端）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStatsDto {
    pub total_users: u64,
    pub active_users: u64,
    pub admin_users: u64,
    pub total_content: u64,
    pub published_content: u64,
    pub draft_content: u64,
    pub archived_content: u64,
    pub total_purchases: u64,
    pub revenue_cents: i64,
}
