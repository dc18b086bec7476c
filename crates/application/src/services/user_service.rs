//! 用户服务
//!
//! 注册和认证。密码哈希通过 PasswordHasher 抽象注入。

use std::sync::Arc;

use domain::{User, UserRepository};

use crate::{clock::Clock, dto::UserDto, error::ApplicationError, password::PasswordHasher};

#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AuthenticateUserRequest {
    pub email: String,
    pub password: String,
}

pub struct UserServiceDependencies {
    pub user_repository: Arc<dyn UserRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
}

pub struct UserService {
    deps: UserServiceDependencies,
}

impl UserService {
    pub fn new(deps: UserServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn register(&self, request: RegisterUserRequest) -> Result<UserDto, ApplicationError> {
        if self.deps.user_repository.email_exists(&request.email).await? {
            return Err(ApplicationError::Domain(
                domain::DomainError::resource_already_exists("user", &request.email),
            ));
        }
        if self
            .deps
            .user_repository
            .username_exists(&request.username)
            .await?
        {
            return Err(ApplicationError::Domain(
                domain::DomainError::resource_already_exists("user", &request.username),
            ));
        }

        let password_hash = self.deps.password_hasher.hash(&request.password).await?;
        let now = self.deps.clock.now();
        let user = User::register(request.username, request.email, password_hash, now)?;

        let stored = self.deps.user_repository.create(&user).await?;
        Ok(UserDto::from(stored))
    }

    /// 认证失败统一返回 Authentication 错误，不区分"用户不存在"
    /// 和"密码错误"。
    pub async fn authenticate(
        &self,
        request: AuthenticateUserRequest,
    ) -> Result<UserDto, ApplicationError> {
        let user = self
            .deps
            .user_repository
            .find_by_email(&request.email)
            .await?
            .ok_or(ApplicationError::Authentication)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(ApplicationError::Authentication)?;

        let password_ok = self.deps.password_hasher.verify(&request.password, hash).await?;
        if !password_ok {
            return Err(ApplicationError::Authentication);
        }

        if !user.is_active() {
            return Err(ApplicationError::Authentication);
        }

        Ok(UserDto::from(user))
    }

    pub async fn get_profile(&self, user_id: uuid::Uuid) -> Result<UserDto, ApplicationError> {
        let user = self
            .deps
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::Domain(domain::DomainError::resource_not_found(
                    "user",
                    user_id.to_string(),
                ))
            })?;
        Ok(UserDto::from(user))
    }
}
