//! 渲染门
//!
//! 在已送达的页面内部按权限或角色选择渲染分支。这是纵深防御：
//! 真正的安全边界是路由守卫（guard），渲染门只决定界面上
//! 展示哪个分支，从不抛错。

use domain::{Principal, Role};

/// 角色门的默认回退文案
pub const ACCESS_DENIED_NOTICE: &str = "您没有权限访问此内容";

/// 权限门
///
/// 主体拥有指定权限时返回 Some(children)，否则 None（默认回退
/// 是什么都不渲染）。未认证主体视为无权限。
pub fn permission_gate<T>(principal: Option<&Principal>, permission: &str, children: T) -> Option<T> {
    match principal {
        Some(principal) if principal.has_permission(permission) => Some(children),
        _ => None,
    }
}

/// 权限门（带显式回退分支）
pub fn permission_gate_or<T>(
    principal: Option<&Principal>,
    permission: &str,
    children: T,
    fallback: T,
) -> T {
    permission_gate(principal, permission, children).unwrap_or(fallback)
}

/// 角色门
///
/// 主体的角色在允许列表中时返回 children，否则返回 fallback。
pub fn role_gate<T>(
    principal: Option<&Principal>,
    allowed_roles: &[Role],
    children: T,
    fallback: T,
) -> T {
    match principal {
        Some(principal) if allowed_roles.contains(&principal.role) => children,
        _ => fallback,
    }
}

/// 角色门（默认回退为"无权限"文案）
pub fn role_gate_notice<'a>(
    principal: Option<&Principal>,
    allowed_roles: &[Role],
    children: &'a str,
) -> &'a str {
    role_gate(principal, allowed_roles, children, ACCESS_DENIED_NOTICE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::permissions;
    use uuid::Uuid;

    fn user() -> Principal {
        Principal::new(Uuid::new_v4(), Role::User)
    }

    fn admin() -> Principal {
        Principal::new(Uuid::new_v4(), Role::Admin)
    }

    #[test]
    fn test_permission_gate_selects_children() {
        let admin = admin();
        assert_eq!(
            permission_gate(Some(&admin), permissions::MANAGE_CONTENT, "编辑"),
            Some("编辑")
        );
    }

    #[test]
    fn test_permission_gate_default_fallback_is_nothing() {
        let user = user();
        assert_eq!(
            permission_gate(Some(&user), permissions::MANAGE_CONTENT, "编辑"),
            None
        );
        // 未认证主体同样不渲染
        assert_eq!(permission_gate(None, permissions::VIEW_CONTENT, "内容"), None);
    }

    #[test]
    fn test_permission_gate_or_uses_fallback() {
        let user = user();
        assert_eq!(
            permission_gate_or(Some(&user), permissions::MANAGE_USERS, "管理", "只读"),
            "只读"
        );
        let admin = admin();
        assert_eq!(
            permission_gate_or(Some(&admin), permissions::MANAGE_USERS, "管理", "只读"),
            "管理"
        );
    }

    #[test]
    fn test_role_gate_membership() {
        let user = user();
        let admin = admin();

        assert_eq!(
            role_gate(Some(&admin), &[Role::Admin], "后台", "无权限"),
            "后台"
        );
        assert_eq!(
            role_gate(Some(&user), &[Role::Admin], "后台", "无权限"),
            "无权限"
        );
        assert_eq!(
            role_gate(Some(&user), &[Role::User, Role::Admin], "面板", "无权限"),
            "面板"
        );
        assert_eq!(role_gate(None, &[Role::User], "面板", "无权限"), "无权限");
    }

    #[test]
    fn test_role_gate_default_notice() {
        let user = user();
        assert_eq!(
            role_gate_notice(Some(&user), &[Role::Admin], "运营统计"),
            ACCESS_DENIED_NOTICE
        );
    }

    #[test]
    fn test_gates_never_panic_for_any_input() {
        // 渲染门是全函数：任意输入组合都有定义的输出
        for principal in [None, Some(user()), Some(admin())] {
            let _ = permission_gate(principal.as_ref(), "", 1);
            let _ = permission_gate(principal.as_ref(), "unknown_permission", 1);
            let _ = role_gate(principal.as_ref(), &[], 1, 0);
        }
    }
}
