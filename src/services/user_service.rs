//! 账户服务：注册、登录、管理员登录

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::jwt::JwtService;
use crate::config::AuthConfig;
use crate::errors::{Result, ShopError};
use crate::storage::{Cart, SeaOrmStorage, User};
use crate::utils::password::{hash_password, verify_configured_password, verify_password};
use crate::utils::{is_valid_email, normalize_email};

/// 最短密码长度
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct UserService {
    storage: Arc<SeaOrmStorage>,
    jwt: Arc<JwtService>,
    admin_email: String,
    admin_password: String,
}

impl UserService {
    pub fn new(storage: Arc<SeaOrmStorage>, jwt: Arc<JwtService>, auth: &AuthConfig) -> Self {
        Self {
            storage,
            jwt,
            admin_email: normalize_email(&auth.admin_email),
            admin_password: auth.admin_password.clone(),
        }
    }

    fn issue_user_token(&self, user_id: &str) -> Result<String> {
        Ok(self.jwt.generate_user_token(user_id)?)
    }

    /// 注册新用户，返回用户 token
    ///
    /// 校验顺序：邮箱已存在 → 邮箱格式 → 密码强度
    pub async fn register(&self, req: RegisterRequest) -> Result<String> {
        let email = normalize_email(&req.email);

        if self.storage.find_user_by_email(&email).await?.is_some() {
            return Err(ShopError::user_exists("User already exists"));
        }
        if !is_valid_email(&email) {
            return Err(ShopError::validation("Please enter a valid email"));
        }
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ShopError::validation("Please enter a strong password"));
        }
        let name = req.name.trim();
        if name.is_empty() {
            return Err(ShopError::validation("Please enter your name"));
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email,
            password: hash_password(&req.password)?,
            cart: Cart::new(),
            created_at: chrono::Utc::now(),
        };

        self.storage.create_user(&user).await?;
        info!("User registered: {}", user.id);

        self.issue_user_token(&user.id)
    }

    /// 用户登录，返回用户 token
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let email = normalize_email(email);

        let user = self
            .storage
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| ShopError::user_not_found("User doesn't exist"))?;

        if !verify_password(password, &user.password)? {
            warn!("Login failed for user {}", user.id);
            return Err(ShopError::unauthorized("Invalid credentials"));
        }

        info!("User logged in: {}", user.id);
        self.issue_user_token(&user.id)
    }

    /// 管理员登录，校验配置中的管理员凭据，返回管理员 token
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<String> {
        if self.admin_email.is_empty() || self.admin_password.is_empty() {
            warn!("Admin login attempted but admin credentials are not configured");
            return Err(ShopError::unauthorized("Invalid credentials"));
        }

        let email_matches = normalize_email(email) == self.admin_email;
        // 邮箱不匹配时也执行密码校验
        let password_matches = verify_configured_password(password, &self.admin_password)?;

        if !(email_matches && password_matches) {
            warn!("Admin login failed");
            return Err(ShopError::unauthorized("Invalid credentials"));
        }

        info!("Admin logged in");
        Ok(self.jwt.generate_admin_token(&self.admin_email)?)
    }

    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    pub async fn find_user(&self, user_id: &str) -> Result<User> {
        self.storage
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| ShopError::user_not_found("User not found"))
    }
}
