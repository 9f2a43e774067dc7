use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::config::AuthConfig;

pub const USER_TOKEN_TYPE: &str = "user";
pub const ADMIN_TOKEN_TYPE: &str = "admin";

/// Global cached JwtService instance
static JWT_SERVICE: OnceLock<JwtService> = OnceLock::new();

/// Get the cached JwtService instance
///
/// Initialized once from the `[auth]` config section on first use.
pub fn get_jwt_service() -> &'static JwtService {
    JWT_SERVICE.get_or_init(|| JwtService::from_config(&crate::config::get_config().auth))
}

/// Token Claims
///
/// 用户 token: `sub` = 用户 id；管理员 token: `sub` = 管理员邮箱
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

/// JWT Service for generating and validating tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    user_token_days: u64,
    admin_token_hours: u64,
}

impl JwtService {
    pub fn new(secret: &str, user_token_days: u64, admin_token_hours: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            user_token_days,
            admin_token_hours,
        }
    }

    /// Create JwtService from config
    pub fn from_config(config: &AuthConfig) -> Self {
        // 未配置密钥时生成随机值，重启后所有 token 失效
        let jwt_secret = if config.jwt_secret.is_empty() {
            tracing::warn!("JWT secret not configured, generating a random secret");
            crate::utils::generate_secure_token(32)
        } else {
            config.jwt_secret.clone()
        };

        Self::new(
            &jwt_secret,
            config.user_token_days,
            config.admin_token_hours,
        )
    }

    fn sign(
        &self,
        sub: &str,
        token_type: &str,
        lifetime: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: token_type.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    fn verify(
        &self,
        token: &str,
        token_type: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;

        if token_data.claims.token_type != token_type {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }

        Ok(token_data.claims)
    }

    /// Generate a storefront user token
    pub fn generate_user_token(&self, user_id: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.sign(
            user_id,
            USER_TOKEN_TYPE,
            Duration::days(self.user_token_days as i64),
        )
    }

    /// Generate an admin dashboard token
    pub fn generate_admin_token(&self, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.sign(
            email,
            ADMIN_TOKEN_TYPE,
            Duration::hours(self.admin_token_hours as i64),
        )
    }

    pub fn validate_user_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        self.verify(token, USER_TOKEN_TYPE)
    }

    pub fn validate_admin_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        self.verify(token, ADMIN_TOKEN_TYPE)
    }
}
