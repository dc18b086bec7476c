//! Web API 层。
//!
//! 提供 Axum 路由，将 HTTP 请求委托给应用层的用例服务。
//! 路由守卫（guard）是安全边界；渲染门（gate）只做纵深防御。

mod admin_routes;
mod auth;
mod error;
mod gate;
mod guard;
mod routes;
mod state;

pub use auth::{JwtService, LoginResponse};
pub use config::JwtConfig;
pub use gate::{permission_gate, role_gate, ACCESS_DENIED_NOTICE};
pub use guard::{classify, route_guard, CurrentUser, RouteClass};
pub use routes::router;
pub use state::AppState;
