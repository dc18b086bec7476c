//! 数据库连接管理

use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

pub mod repositories;

pub type DbPool = Pool<Postgres>;

/// 创建 PostgreSQL 连接池
pub async fn create_pg_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
