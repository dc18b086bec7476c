//! 基础设施层
//!
//! PostgreSQL 仓储实现和密码哈希实现。内层（domain/application）
//! 定义接口，这里提供外部依赖的具体绑定。

pub mod db;
pub mod password;

pub use db::repositories::{
    PgCategoryRepository, PgContentRepository, PgProgressRepository, PgPurchaseRepository,
    PgUserRepository,
};
pub use db::{create_pg_pool, DbPool};
pub use password::BcryptPasswordHasher;
