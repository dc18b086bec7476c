//! JWT 认证模块
//!
//! 提供 JWT token 生成、验证，以及从请求头解析已验证主体。

use axum::http::HeaderMap;
use config::JwtConfig;
use domain::{Principal, Role};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// JWT Claims 结构
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// 用户ID
    pub sub: Uuid,
    /// 角色（字符串形式，解析时按 fail-closed 处理）
    pub role: String,
    /// 过期时间 (Unix timestamp)
    pub exp: i64,
}

/// JWT Token 服务
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_ref());
        let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 生成 JWT token
    pub fn generate_token(&self, user_id: Uuid, role: Role) -> Result<String, ApiError> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: user_id,
            role: role.as_str().to_string(),
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| ApiError::internal_server_error(format!("Token generation failed: {}", err)))
    }

    /// 验证并解析 JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)
            .map_err(|err| ApiError::unauthorized(format!("Invalid token: {}", err)))
    }

    /// 从请求头解析已验证主体
    ///
    /// 缺失、格式错误、过期的 token 和未知角色一律返回 None
    /// （视为未认证），从不向上抛错。
    pub fn principal_from_headers(&self, headers: &HeaderMap) -> Option<Principal> {
        let auth_header = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok())?;

        let token = auth_header.strip_prefix("Bearer ")?;
        let claims = self.verify_token(token).ok()?;
        let role = Role::parse(&claims.role)?;

        Some(Principal::new(claims.sub, role))
    }
}

/// 登录响应结构
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: application::UserDto,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    fn service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-key-with-enough-length-32".to_string(),
            expiration_hours: 24,
        })
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_token_round_trip() {
        let service = service();
        let user_id = Uuid::new_v4();

        let token = service.generate_token(user_id, Role::Admin).unwrap();
        let principal = service
            .principal_from_headers(&headers_with(&format!("Bearer {token}")))
            .unwrap();

        assert_eq!(principal.subject, user_id);
        assert_eq!(principal.role, Role::Admin);
    }

    #[test]
    fn test_missing_header_is_unauthenticated() {
        let service = service();
        assert!(service.principal_from_headers(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_malformed_header_is_unauthenticated() {
        let service = service();
        // 缺少 Bearer 前缀
        assert!(service
            .principal_from_headers(&headers_with("Token abc"))
            .is_none());
        // 无法解析的 token
        assert!(service
            .principal_from_headers(&headers_with("Bearer not-a-jwt"))
            .is_none());
    }

    #[test]
    fn test_wrong_secret_is_unauthenticated() {
        let token = service().generate_token(Uuid::new_v4(), Role::User).unwrap();
        let other = JwtService::new(JwtConfig {
            secret: "another-secret-key-with-enough-length".to_string(),
            expiration_hours: 24,
        });

        assert!(other
            .principal_from_headers(&headers_with(&format!("Bearer {token}")))
            .is_none());
    }
}
