//! 用户Repository接口

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::user::User;
use crate::errors::DomainResult;

/// 用户统计
#[derive(Debug, Clone, Default)]
pub struct UserStatistics {
    pub total_users: u64,
    pub active_users: u64,
    pub admin_users: u64,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> DomainResult<User>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;

    async fn update(&self, user: &User) -> DomainResult<User>;

    async fn username_exists(&self, username: &str) -> DomainResult<bool>;

    async fn email_exists(&self, email: &str) -> DomainResult<bool>;

    async fn statistics(&self) -> DomainResult<UserStatistics>;
}
