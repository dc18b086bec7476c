//! 分类Repository实现

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Category, CategoryRepository, DomainError, DomainResult};
use sqlx::{query_as, FromRow};
use uuid::Uuid;

use crate::db::DbPool;

#[derive(Debug, Clone, FromRow)]
struct DbCategory {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbCategory> for Category {
    fn from(db: DbCategory) -> Self {
        Category {
            id: db.id,
            slug: db.slug,
            name: db.name,
            created_at: db.created_at,
        }
    }
}

/// 分类Repository实现
pub struct PgCategoryRepository {
    pool: Arc<DbPool>,
}

impl PgCategoryRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, category: &Category) -> DomainResult<Category> {
        let result = query_as::<_, DbCategory>(
            r#"
            INSERT INTO categories (id, slug, name, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, slug, name, created_at
            "#,
        )
        .bind(category.id)
        .bind(&category.slug)
        .bind(&category.name)
        .bind(category.created_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(result.into())
    }

    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Category>> {
        let result = query_as::<_, DbCategory>(
            "SELECT id, slug, name, created_at FROM categories WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(result.map(Category::from))
    }

    async fn list_all(&self) -> DomainResult<Vec<Category>> {
        let rows = query_as::<_, DbCategory>(
            "SELECT id, slug, name, created_at FROM categories ORDER BY name ASC",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(rows.into_iter().map(Category::from).collect())
    }
}
