//! 内容实体定义
//!
//! 目录中的一条可购买或免费的教学内容，生命周期为
//! draft -> published -> archived。查询构建器只读取 published 记录。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// 内容格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// 视频
    Video,
    /// PDF文档
    Pdf,
    /// 图文
    Text,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Pdf => "pdf",
            ContentType::Text => "text",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "video" => Some(ContentType::Video),
            "pdf" => Some(ContentType::Pdf),
            "text" => Some(ContentType::Text),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 难度标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 内容状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    /// 草稿
    Draft,
    /// 已发布
    Published,
    /// 已下架
    Archived,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
            ContentStatus::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(ContentStatus::Draft),
            "published" => Some(ContentStatus::Published),
            "archived" => Some(ContentStatus::Archived),
            _ => None,
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 内容实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// 内容唯一ID
    pub id: Uuid,
    /// URL友好的唯一标识
    pub slug: String,
    /// 标题
    pub title: String,
    /// 摘要（可选）
    pub excerpt: Option<String>,
    /// 详细描述（可选）
    pub description: Option<String>,
    /// 内容格式
    pub content_type: ContentType,
    /// 难度标签
    pub difficulty: Difficulty,
    /// 内容状态
    pub status: ContentStatus,
    /// 是否免费
    pub is_free: bool,
    /// 价格（分）
    pub price_cents: i64,
    /// 发布时间（仅发布后存在）
    pub published_at: Option<DateTime<Utc>>,
    /// 平均评分
    pub rating: f64,
    /// 购买数
    pub purchase_count: i64,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl Content {
    /// 创建新的草稿内容
    pub fn new_draft(
        slug: impl Into<String>,
        title: impl Into<String>,
        content_type: ContentType,
        difficulty: Difficulty,
        price_cents: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let slug = slug.into();
        let title = title.into();

        Self::validate_slug(&slug)?;
        Self::validate_title(&title)?;
        Self::validate_price(price_cents)?;

        Ok(Self {
            id: Uuid::new_v4(),
            slug,
            title,
            excerpt: None,
            description: None,
            content_type,
            difficulty,
            status: ContentStatus::Draft,
            is_free: price_cents == 0,
            price_cents,
            published_at: None,
            rating: 0.0,
            purchase_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// 更新标题、摘要、描述
    pub fn update_details(
        &mut self,
        title: Option<String>,
        excerpt: Option<String>,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if let Some(title) = title {
            Self::validate_title(&title)?;
            self.title = title;
        }
        if excerpt.is_some() {
            self.excerpt = excerpt;
        }
        if description.is_some() {
            self.description = description;
        }
        self.updated_at = now;
        Ok(())
    }

    /// 更新定价
    ///
    /// 价格为 0 时内容自动标记为免费。
    pub fn update_price(&mut self, price_cents: i64, now: DateTime<Utc>) -> DomainResult<()> {
        Self::validate_price(price_cents)?;
        self.price_cents = price_cents;
        self.is_free = price_cents == 0;
        self.updated_at = now;
        Ok(())
    }

    /// 发布内容，记录发布时间
    pub fn publish(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == ContentStatus::Archived {
            return Err(DomainError::business_rule_violation(
                "已下架的内容不能重新发布",
            ));
        }
        self.status = ContentStatus::Published;
        if self.published_at.is_none() {
            self.published_at = Some(now);
        }
        self.updated_at = now;
        Ok(())
    }

    /// 下架内容
    pub fn archive(&mut self, now: DateTime<Utc>) {
        self.status = ContentStatus::Archived;
        self.updated_at = now;
    }

    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }

    fn validate_slug(slug: &str) -> DomainResult<()> {
        if slug.is_empty() {
            return Err(DomainError::validation_error("slug", "slug不能为空"));
        }
        if slug.len() > 120 {
            return Err(DomainError::validation_error(
                "slug",
                "slug长度不能超过120个字符",
            ));
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(DomainError::validation_error(
                "slug",
                "slug只能包含小写字母、数字和连字符",
            ));
        }
        Ok(())
    }

    fn validate_title(title: &str) -> DomainResult<()> {
        if title.trim().is_empty() {
            return Err(DomainError::validation_error("title", "标题不能为空"));
        }
        if title.len() > 200 {
            return Err(DomainError::validation_error(
                "title",
                "标题长度不能超过200个字符",
            ));
        }
        Ok(())
    }

    fn validate_price(price_cents: i64) -> DomainResult<()> {
        if price_cents < 0 {
            return Err(DomainError::validation_error("price", "价格不能为负数"));
        }
        Ok(())
    }
}
