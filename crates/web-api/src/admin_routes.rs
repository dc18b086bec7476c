//! 管理端内容维护路由
//!
//! 整个 /admin 前缀由路由守卫限定为管理员角色，这里的处理器
//! 只负责把请求委托给管理服务。

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use application::services::{CreateContentRequest, UpdateContentRequest};
use application::{ContentDto, PageInfo, PlatformStatsDto};
use domain::{ContentType, Difficulty, Pagination};

use crate::error::ApiError;
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/content", get(list_content).post(create_content))
        .route("/content/{id}", axum::routing::put(update_content).delete(delete_content))
        .route("/content/{id}/publish", post(publish_content))
        .route("/content/{id}/archive", post(archive_content))
        .route("/stats", get(get_stats))
}

#[derive(Debug, Deserialize)]
struct AdminPageQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateContentPayload {
    slug: String,
    title: String,
    content_type: ContentType,
    difficulty: Difficulty,
    price_cents: i64,
    excerpt: Option<String>,
    description: Option<String>,
    #[serde(default)]
    category_slugs: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UpdateContentPayload {
    title: Option<String>,
    excerpt: Option<String>,
    description: Option<String>,
    price_cents: Option<i64>,
}

#[derive(Debug, Serialize)]
struct AdminContentListResponse {
    data: Vec<ContentDto>,
    pagination: PageInfo,
}

/// 管理端列表，包含草稿和已下架内容
async fn list_content(
    State(state): State<AppState>,
    Query(query): Query<AdminPageQuery>,
) -> Result<Json<AdminContentListResponse>, ApiError> {
    let pagination = Pagination::new(
        query.page.unwrap_or(1),
        query
            .limit
            .unwrap_or(state.catalog_config.default_page_size)
            .min(state.catalog_config.max_page_size),
    );

    let (data, pagination) = state.content_admin_service.list(&pagination).await?;
    Ok(Json(AdminContentListResponse { data, pagination }))
}

async fn create_content(
    State(state): State<AppState>,
    Json(payload): Json<CreateContentPayload>,
) -> Result<(StatusCode, Json<ContentDto>), ApiError> {
    let dto = state
        .content_admin_service
        .create(CreateContentRequest {
            slug: payload.slug,
            title: payload.title,
            content_type: payload.content_type,
            difficulty: payload.difficulty,
            price_cents: payload.price_cents,
            excerpt: payload.excerpt,
            description: payload.description,
            category_slugs: payload.category_slugs,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(dto)))
}

async fn update_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateContentPayload>,
) -> Result<Json<ContentDto>, ApiError> {
    let dto = state
        .content_admin_service
        .update(
            id,
            UpdateContentRequest {
                title: payload.title,
                excerpt: payload.excerpt,
                description: payload.description,
                price_cents: payload.price_cents,
            },
        )
        .await?;

    Ok(Json(dto))
}

async fn publish_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContentDto>, ApiError> {
    let dto = state.content_admin_service.publish(id).await?;
    Ok(Json(dto))
}

async fn archive_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContentDto>, ApiError> {
    let dto = state.content_admin_service.archive(id).await?;
    Ok(Json(dto))
}

async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.content_admin_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<PlatformStatsDto>, ApiError> {
    let stats = state.content_admin_service.stats().await?;
    Ok(Json(stats))
}
