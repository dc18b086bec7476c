//! 用户实体定义
//!
//! 包含用户的核心信息和相关操作。角色决定授权策略（见 access 模块）。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::access::Role;
use crate::errors::{DomainError, DomainResult};

/// 用户状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// 活跃状态
    #[default]
    Active,
    /// 暂停
    Suspended,
    /// 已删除
    Deleted,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Suspended => write!(f, "suspended"),
            UserStatus::Deleted => write!(f, "deleted"),
        }
    }
}

impl UserStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(UserStatus::Active),
            "suspended" => Some(UserStatus::Suspended),
            "deleted" => Some(UserStatus::Deleted),
            _ => None,
        }
    }
}

/// 用户实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// 用户唯一ID
    pub id: Uuid,
    /// 用户名（唯一）
    pub username: String,
    /// 邮箱（唯一）
    pub email: String,
    /// 密码哈希（敏感信息，不在序列化中包含）
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// 用户角色
    pub role: Role,
    /// 用户状态
    pub status: UserStatus,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// 创建新用户（默认普通用户角色）
    pub fn register(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let username = username.into();
        let email = email.into();

        Self::validate_username(&username)?;
        Self::validate_email(&email)?;

        Ok(Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash: Some(password_hash),
            role: Role::User,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// 授予管理员角色
    pub fn grant_admin(&mut self, now: DateTime<Utc>) {
        self.role = Role::Admin;
        self.updated_at = now;
    }

    /// 暂停用户
    pub fn suspend(&mut self, now: DateTime<Utc>) {
        self.status = UserStatus::Suspended;
        self.updated_at = now;
    }

    /// 软删除用户
    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.status = UserStatus::Deleted;
        self.updated_at = now;
    }

    /// 检查用户是否活跃
    pub fn is_active(&self) -> bool {
        matches!(self.status, UserStatus::Active)
    }

    /// 验证用户名格式
    fn validate_username(username: &str) -> DomainResult<()> {
        if username.is_empty() {
            return Err(DomainError::validation_error("username", "用户名不能为空"));
        }

        if username.len() < 2 {
            return Err(DomainError::validation_error(
                "username",
                "用户名长度至少2个字符",
            ));
        }

        if username.len() > 50 {
            return Err(DomainError::validation_error(
                "username",
                "用户名长度不能超过50个字符",
            ));
        }

        // 只允许字母、数字、下划线和连字符
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(DomainError::validation_error(
                "username",
                "用户名只能包含字母、数字、下划线和连字符",
            ));
        }

        Ok(())
    }

    /// 验证邮箱格式
    fn validate_email(email: &str) -> DomainResult<()> {
        if email.is_empty() {
            return Err(DomainError::validation_error("email", "邮箱不能为空"));
        }

        if !email.contains('@') || !email.contains('.') {
            return Err(DomainError::validation_error("email", "邮箱格式不正确"));
        }

        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(DomainError::validation_error("email", "邮箱格式不正确"));
        }

        if email.len() > 255 {
            return Err(DomainError::validation_error(
                "email",
                "邮箱长度不能超过255个字符",
            ));
        }

        Ok(())
    }
}
