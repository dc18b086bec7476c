//! 内容分类实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// 内容分类
///
/// 与内容多对多关联，目录按分类 slug 过滤。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    /// URL友好的唯一标识
    pub slug: String,
    /// 显示名称
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(
        slug: impl Into<String>,
        name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let slug = slug.into();
        let name = name.into();

        if slug.is_empty()
            || !slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(DomainError::validation_error(
                "slug",
                "分类slug只能包含小写字母、数字和连字符",
            ));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation_error("name", "分类名称不能为空"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            slug,
            name,
            created_at: now,
        })
    }
}
