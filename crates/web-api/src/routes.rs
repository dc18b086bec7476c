use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use application::services::{
    AuthenticateUserRequest, RecordProgressRequest, RegisterUserRequest,
};
use application::{ContentDto, ContentPage, PageInfo, ProgressDto, PurchaseDto, UserDto};
use domain::{permissions, ContentFilter, Pagination, Role};

use crate::admin_routes::admin_routes;
use crate::auth::LoginResponse;
use crate::error::ApiError;
use crate::gate::{permission_gate, role_gate_notice};
use crate::guard::{route_guard, CurrentUser, MaybeUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct RegisterPayload {
    username: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
}

/// 目录查询参数，字段名与前端查询串保持一致
#[derive(Debug, Deserialize)]
struct CatalogQuery {
    #[serde(rename = "type")]
    content_type: Option<String>,
    category: Option<String>,
    search: Option<String>,
    #[serde(rename = "sortBy")]
    sort_by: Option<String>,
    difficulty: Option<String>,
    price: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PurchasePayload {
    content_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressPayload {
    position_seconds: u32,
    duration_seconds: u32,
}

#[derive(Debug, Serialize)]
struct SigninPage {
    code: &'static str,
    message: &'static str,
    #[serde(rename = "callbackUrl", skip_serializing_if = "Option::is_none")]
    callback_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SigninQuery {
    #[serde(rename = "callbackUrl")]
    callback_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct ContentDetailResponse {
    #[serde(flatten)]
    content: ContentDto,
    /// 管理入口，仅对持有 manage_content 权限的主体渲染
    #[serde(rename = "manageUrl", skip_serializing_if = "Option::is_none")]
    manage_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct PurchaseListResponse {
    data: Vec<PurchaseDto>,
    pagination: PageInfo,
}

#[derive(Debug, Serialize)]
struct ProfileResponse {
    user: UserDto,
    /// 管理面板入口，权限门按 manage_content 选择渲染
    #[serde(rename = "adminPanel", skip_serializing_if = "Option::is_none")]
    admin_panel: Option<String>,
    /// 运营统计区块，角色门的回退是固定的无权限文案
    analytics: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/signin", get(signin_page))
        .route("/unauthorized", get(unauthorized_page))
        .nest("/api/v1", api_routes())
        .nest("/dashboard", dashboard_routes())
        .nest("/admin", admin_routes())
        .layer(from_fn_with_state(state.jwt_service.clone(), route_guard))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/content", get(list_content))
        .route("/content/{slug}", get(get_content))
        .route("/categories", get(list_categories))
        .route("/auth/register", post(register_user))
        .route("/auth/login", post(login_user))
}

fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/purchases", get(list_purchases).post(create_purchase))
        .route(
            "/progress/{content_id}",
            get(get_progress).put(record_progress),
        )
        .route("/profile", get(get_profile))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// 登录终止页：路由守卫的重定向目标，回显 callbackUrl 供登录后跳回
async fn signin_page(Query(query): Query<SigninQuery>) -> Json<SigninPage> {
    Json(SigninPage {
        code: "SIGNIN_REQUIRED",
        message: "请先登录",
        callback_url: query.callback_url,
    })
}

/// 角色不足的终止页
async fn unauthorized_page() -> (StatusCode, Json<SigninPage>) {
    (
        StatusCode::FORBIDDEN,
        Json(SigninPage {
            code: "FORBIDDEN",
            message: "您没有权限访问此页面",
            callback_url: None,
        }),
    )
}

/// 目录查询
///
/// 总是返回 200 和结果信封；查询失败表现为 success=false，
/// 不是 HTTP 错误。limit 在这一边界被压到配置的上限以内。
async fn list_content(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<ContentPage> {
    let filter = ContentFilter {
        content_type: query.content_type,
        category: query.category,
        search: query.search,
        sort: query.sort_by,
        difficulty: query.difficulty,
        price: query.price,
        page: query.page,
        limit: query
            .limit
            .map(|limit| limit.min(state.catalog_config.max_page_size)),
    };

    Json(state.catalog_service.browse(&filter).await)
}

async fn get_content(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    MaybeUser(principal): MaybeUser,
) -> Result<Json<ContentDetailResponse>, ApiError> {
    let content = state
        .catalog_service
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("content {} not found", slug)))?;

    let manage_url = permission_gate(
        principal.as_ref(),
        permissions::MANAGE_CONTENT,
        format!("/admin/content/{}", content.id),
    );

    Ok(Json(ContentDetailResponse {
        content,
        manage_url,
    }))
}

async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<application::CategoryDto>>, ApiError> {
    let categories = state.catalog_service.list_categories().await?;
    Ok(Json(categories))
}

async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let dto = state
        .user_service
        .register(RegisterUserRequest {
            username: payload.username,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(dto)))
}

async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .user_service
        .authenticate(AuthenticateUserRequest {
            email: payload.email,
            password: payload.password,
        })
        .await?;

    let token = state.jwt_service.generate_token(user.id, user.role)?;
    Ok(Json(LoginResponse { user, token }))
}

async fn list_purchases(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<PurchaseListResponse>, ApiError> {
    let pagination = Pagination::new(
        query.page.unwrap_or(1),
        query
            .limit
            .unwrap_or(state.catalog_config.default_page_size)
            .min(state.catalog_config.max_page_size),
    );

    let (data, pagination) = state
        .purchase_service
        .list(principal.subject, &pagination)
        .await?;

    Ok(Json(PurchaseListResponse { data, pagination }))
}

async fn create_purchase(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(payload): Json<PurchasePayload>,
) -> Result<(StatusCode, Json<PurchaseDto>), ApiError> {
    let dto = state
        .purchase_service
        .purchase(principal.subject, payload.content_id)
        .await?;

    Ok((StatusCode::CREATED, Json(dto)))
}

async fn get_progress(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(content_id): Path<Uuid>,
) -> Result<Json<ProgressDto>, ApiError> {
    let progress = state
        .progress_service
        .get(principal.subject, content_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("no progress for content {}", content_id)))?;

    Ok(Json(progress))
}

async fn record_progress(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(content_id): Path<Uuid>,
    Json(payload): Json<ProgressPayload>,
) -> Result<Json<ProgressDto>, ApiError> {
    let dto = state
        .progress_service
        .record(
            principal.subject,
            RecordProgressRequest {
                content_id,
                position_seconds: payload.position_seconds,
                duration_seconds: payload.duration_seconds,
            },
        )
        .await?;

    Ok(Json(dto))
}

async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state.user_service.get_profile(principal.subject).await?;

    let admin_panel = permission_gate(
        Some(&principal),
        permissions::MANAGE_CONTENT,
        "/admin/content".to_string(),
    );
    let analytics = role_gate_notice(Some(&principal), &[Role::Admin], "运营统计已开放").to_string();

    Ok(Json(ProfileResponse {
        user,
        admin_panel,
        analytics,
    }))
}
