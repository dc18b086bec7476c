//! 路由守卫
//!
//! 在路由匹配前按路径前缀实施访问控制。受保护前缀是显式
//! 枚举的允许列表：未列出的路径一律放行（隐式公开）。
//!
//! 判定使用显式传入的已验证主体（由 JwtService 从请求头解析），
//! 不读取任何全局会话状态。缺失或无效的 token 等同于未认证，
//! 从不作为错误向上传播。

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use domain::Principal;

use crate::auth::JwtService;
use crate::error::ApiError;

/// 需要登录的路径前缀
const USER_PROTECTED_PREFIXES: &[&str] = &["/dashboard"];

/// 需要管理员角色的路径前缀
const ADMIN_PROTECTED_PREFIXES: &[&str] = &["/admin"];

/// 登录页路径，重定向时携带 callbackUrl 指向原始路径
const SIGNIN_PATH: &str = "/signin";

/// 角色不足时的终止页
const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// 路径分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// 公开路径，直接放行
    Public,
    /// 任意已认证用户可访问
    UserProtected,
    /// 仅管理员可访问
    AdminProtected,
}

/// 前缀匹配到路径段边界，"/dashboardfoo" 不算命中 "/dashboard"
fn path_has_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// 按允许列表对路径分类
pub fn classify(path: &str) -> RouteClass {
    if ADMIN_PROTECTED_PREFIXES
        .iter()
        .any(|prefix| path_has_prefix(path, prefix))
    {
        return RouteClass::AdminProtected;
    }
    if USER_PROTECTED_PREFIXES
        .iter()
        .any(|prefix| path_has_prefix(path, prefix))
    {
        return RouteClass::UserProtected;
    }
    RouteClass::Public
}

/// 路由守卫中间件
///
/// - 受保护路径上未认证 ⇒ 303 重定向到登录页，callbackUrl 保留原始路径
/// - 管理路径上角色不足 ⇒ 303 重定向到 /unauthorized，不泄露响应体
/// - 其余情况放行，并把已验证主体注入请求扩展供处理器使用
pub async fn route_guard(
    State(jwt_service): State<Arc<JwtService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let class = classify(request.uri().path());
    let principal = jwt_service.principal_from_headers(request.headers());

    match (class, principal) {
        (RouteClass::Public, principal) => {
            // 公开路径也注入主体，处理器可做可选的界面降级
            if let Some(principal) = principal {
                request.extensions_mut().insert(principal);
            }
            next.run(request).await
        }
        (RouteClass::UserProtected | RouteClass::AdminProtected, None) => {
            let callback = request.uri().path();
            Redirect::to(&format!("{SIGNIN_PATH}?callbackUrl={callback}")).into_response()
        }
        (RouteClass::AdminProtected, Some(principal)) if !principal.is_admin() => {
            tracing::warn!(subject = %principal.subject, path = %request.uri().path(), "非管理员访问管理路径");
            Redirect::to(UNAUTHORIZED_PATH).into_response()
        }
        (_, Some(principal)) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
    }
}

/// 处理器中的已认证主体提取器
///
/// 只在守卫覆盖的路径上可用；主体缺失说明路由没有被守卫
/// 保护，按未认证拒绝。
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .map(CurrentUser)
            .ok_or_else(|| ApiError::unauthorized("missing authenticated principal"))
    }
}

/// 可选主体提取器，公开路径上使用，从不拒绝请求
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<Principal>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<Principal>().copied()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use config::JwtConfig;
    use domain::Role;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn jwt_service() -> Arc<JwtService> {
        Arc::new(JwtService::new(JwtConfig {
            secret: "guard-test-secret-key-with-enough-length".to_string(),
            expiration_hours: 1,
        }))
    }

    fn test_router(jwt_service: Arc<JwtService>) -> Router {
        Router::new()
            .route("/", get(|| async { "home" }))
            .route("/dashboardfoo", get(|| async { "not protected" }))
            .route(
                "/dashboard/purchases",
                get(|user: CurrentUser| async move { user.0.subject.to_string() }),
            )
            .route("/admin/content", get(|| async { "admin content" }))
            .layer(from_fn_with_state(jwt_service, route_guard))
    }

    fn bearer(jwt_service: &JwtService, role: Role) -> String {
        let token = jwt_service.generate_token(Uuid::new_v4(), role).unwrap();
        format!("Bearer {token}")
    }

    async fn send(router: Router, uri: &str, auth: Option<&str>) -> axum::response::Response {
        let mut builder = HttpRequest::builder().uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        router
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .expect("expected redirect")
            .to_str()
            .unwrap()
    }

    #[test]
    fn test_classify_prefix_table() {
        assert_eq!(classify("/"), RouteClass::Public);
        assert_eq!(classify("/api/v1/content"), RouteClass::Public);
        assert_eq!(classify("/dashboard"), RouteClass::UserProtected);
        assert_eq!(classify("/dashboard/purchases"), RouteClass::UserProtected);
        assert_eq!(classify("/admin"), RouteClass::AdminProtected);
        assert_eq!(classify("/admin/content/123"), RouteClass::AdminProtected);

        // 前缀匹配到路径段边界
        assert_eq!(classify("/dashboardfoo"), RouteClass::Public);
        assert_eq!(classify("/administrator"), RouteClass::Public);
    }

    #[tokio::test]
    async fn test_anonymous_dashboard_redirects_to_signin_with_callback() {
        let response = send(test_router(jwt_service()), "/dashboard/purchases", None).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&response),
            "/signin?callbackUrl=/dashboard/purchases"
        );
    }

    #[tokio::test]
    async fn test_malformed_token_is_treated_as_unauthenticated() {
        let response = send(
            test_router(jwt_service()),
            "/dashboard/purchases",
            Some("Bearer garbage"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&response),
            "/signin?callbackUrl=/dashboard/purchases"
        );
    }

    #[tokio::test]
    async fn test_user_role_on_admin_path_redirects_to_unauthorized() {
        let jwt = jwt_service();
        let auth = bearer(&jwt, Role::User);

        let response = send(test_router(jwt), "/admin/content", Some(&auth)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/unauthorized");
    }

    #[tokio::test]
    async fn test_anonymous_admin_path_redirects_to_signin() {
        let response = send(test_router(jwt_service()), "/admin/content", None).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/signin?callbackUrl=/admin/content");
    }

    #[tokio::test]
    async fn test_admin_role_passes_admin_path() {
        let jwt = jwt_service();
        let auth = bearer(&jwt, Role::Admin);

        let response = send(test_router(jwt), "/admin/content", Some(&auth)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_authenticated_user_passes_dashboard() {
        let jwt = jwt_service();
        let auth = bearer(&jwt, Role::User);

        let response = send(test_router(jwt), "/dashboard/purchases", Some(&auth)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_can_access_dashboard() {
        let jwt = jwt_service();
        let auth = bearer(&jwt, Role::Admin);

        let response = send(test_router(jwt), "/dashboard/purchases", Some(&auth)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_public_path_passes_without_token() {
        let response = send(test_router(jwt_service()), "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_prefix_boundary_is_not_protected() {
        let response = send(test_router(jwt_service()), "/dashboardfoo", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
