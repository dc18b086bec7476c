//! 访问控制策略
//!
//! 提供角色到权限集合的静态映射和权限检查函数。授权策略集中在
//! 这一处枚举，可静态审计；新增权限只需要修改此文件。
//!
//! 未知角色不拥有任何权限（fail-closed，默认拒绝）。

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// 系统预定义权限
pub mod permissions {
    /// 访问用户面板
    pub const ACCESS_DASHBOARD: &str = "access_dashboard";
    /// 浏览内容
    pub const VIEW_CONTENT: &str = "view_content";
    /// 购买内容
    pub const PURCHASE_CONTENT: &str = "purchase_content";
    /// 查看个人资料
    pub const VIEW_PROFILE: &str = "view_profile";

    /// 内容管理
    pub const MANAGE_CONTENT: &str = "manage_content";
    /// 用户管理
    pub const MANAGE_USERS: &str = "manage_users";
    /// 查看运营统计
    pub const VIEW_ANALYTICS: &str = "view_analytics";
    /// 系统设置
    pub const SYSTEM_SETTINGS: &str = "system_settings";
}

/// 用户角色
///
/// 粗粒度的主体分类，驱动路由和界面层的授权决策。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// 普通用户
    User,
    /// 管理员
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    /// 从字符串解析角色；未知字符串返回 None（调用方按无权限处理）
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "USER" => Some(Role::User),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    /// 检查角色是否拥有指定权限
    pub fn allows(&self, permission: &str) -> bool {
        ROLE_PERMISSIONS
            .get(self)
            .map(|set| set.contains(permission))
            .unwrap_or(false)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 角色权限静态映射表
///
/// 不变式：每个角色映射到非空、无重复的权限集合。
static ROLE_PERMISSIONS: Lazy<HashMap<Role, HashSet<&'static str>>> = Lazy::new(|| {
    use permissions::*;

    let mut table = HashMap::new();
    table.insert(
        Role::User,
        HashSet::from([ACCESS_DASHBOARD, VIEW_CONTENT, PURCHASE_CONTENT, VIEW_PROFILE]),
    );
    table.insert(
        Role::Admin,
        HashSet::from([
            ACCESS_DASHBOARD,
            MANAGE_CONTENT,
            MANAGE_USERS,
            VIEW_ANALYTICS,
            SYSTEM_SETTINGS,
        ]),
    );
    table
});

/// 权限检查
///
/// 对任意字符串输入总是有定义：未知角色视为不拥有任何权限，
/// 权限按完整字符串精确匹配，不做前缀或层级推导。
pub fn has_permission(role: &str, permission: &str) -> bool {
    Role::parse(role)
        .map(|r| r.allows(permission))
        .unwrap_or(false)
}

/// 已验证的请求主体
///
/// 由外部令牌校验器构造后显式传入访问守卫和处理器，
/// 核心逻辑不读取任何全局会话状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// 用户ID
    pub subject: Uuid,
    /// 用户角色
    pub role: Role,
}

impl Principal {
    pub fn new(subject: Uuid, role: Role) -> Self {
        Self { subject, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.role.allows(permission)
    }
}
