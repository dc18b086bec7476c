//! 用户Repository实现

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{DomainError, DomainResult, Role, User, UserRepository, UserStatistics, UserStatus};
use sqlx::{query, query_as, FromRow, Row};
use uuid::Uuid;

use crate::db::DbPool;

/// 数据库用户模型
#[derive(Debug, Clone, FromRow)]
struct DbUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbUser> for User {
    fn from(db_user: DbUser) -> Self {
        User {
            id: db_user.id,
            username: db_user.username,
            email: db_user.email,
            password_hash: db_user.password_hash,
            // 未知角色按普通用户处理（fail-closed 留给权限表）
            role: Role::parse(&db_user.role).unwrap_or(Role::User),
            status: UserStatus::from_str(&db_user.status).unwrap_or(UserStatus::Active),
            created_at: db_user.created_at,
            updated_at: db_user.updated_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, status, created_at, updated_at";

/// 用户Repository实现
pub struct PgUserRepository {
    pool: Arc<DbPool>,
}

impl PgUserRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> DomainResult<User> {
        let result = query_as::<_, DbUser>(&format!(
            r#"
            INSERT INTO users (id, username, email, password_hash, role, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.status.to_string())
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(result.into())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        let result = query_as::<_, DbUser>(&format!(
            "SELECT {} FROM users WHERE id = $1 AND status != 'deleted'",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(result.map(|u| u.into()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let result = query_as::<_, DbUser>(&format!(
            "SELECT {} FROM users WHERE email = $1 AND status != 'deleted'",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(result.map(|u| u.into()))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let result = query_as::<_, DbUser>(&format!(
            "SELECT {} FROM users WHERE username = $1 AND status != 'deleted'",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(result.map(|u| u.into()))
    }

    async fn update(&self, user: &User) -> DomainResult<User> {
        let result = query_as::<_, DbUser>(&format!(
            r#"
            UPDATE users
            SET username = $2, email = $3, password_hash = $4, role = $5,
                status = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.status.to_string())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(result.into())
    }

    async fn username_exists(&self, username: &str) -> DomainResult<bool> {
        let count: i64 =
            query("SELECT COUNT(*) FROM users WHERE username = $1 AND status != 'deleted'")
                .bind(username)
                .fetch_one(&*self.pool)
                .await
                .map_err(|e| DomainError::database_error(e.to_string()))?
                .get(0);

        Ok(count > 0)
    }

    async fn email_exists(&self, email: &str) -> DomainResult<bool> {
        let count: i64 = query("SELECT COUNT(*) FROM users WHERE email = $1 AND status != 'deleted'")
            .bind(email)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| DomainError::database_error(e.to_string()))?
            .get(0);

        Ok(count > 0)
    }

    async fn statistics(&self) -> DomainResult<UserStatistics> {
        let row = query(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status != 'deleted') as total_users,
                COUNT(*) FILTER (WHERE status = 'active') as active_users,
                COUNT(*) FILTER (WHERE role = 'ADMIN' AND status != 'deleted') as admin_users
            FROM users
            "#,
        )
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| DomainError::database_error(e.to_string()))?;

        Ok(UserStatistics {
            total_users: row.get::<i64, _>("total_users") as u64,
            active_users: row.get::<i64, _>("active_users") as u64,
            admin_users: row.get::<i64, _>("admin_users") as u64,
        })
    }
}
