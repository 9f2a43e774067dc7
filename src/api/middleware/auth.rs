use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, StatusCode},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::api::constants::TOKEN_HEADER;
use crate::api::jwt::{Claims, JwtService, get_jwt_service};
use crate::api::services::shop::{ApiResponse, ErrorCode};
use crate::services::UserService;
use crate::utils::normalize_email;

/// 未携带 token
pub const MISSING_TOKEN_MESSAGE: &str = "Not Authorized Login Again";
/// token 无效或已过期
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

/// 已认证的店面用户，handler 通过 `web::ReqData<AuthenticatedUser>` 获取
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// 已认证的管理员
#[derive(Clone, Debug)]
pub struct AuthenticatedAdmin {
    pub email: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AuthScope {
    User,
    Admin,
}

/// Token authentication middleware
///
/// token 来自 `token` 请求头或 `Authorization: Bearer`。
#[derive(Clone)]
pub struct RequireAuth {
    scope: AuthScope,
}

impl RequireAuth {
    pub fn user() -> Self {
        Self {
            scope: AuthScope::User,
        }
    }

    pub fn admin() -> Self {
        Self {
            scope: AuthScope::Admin,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware {
            service: Rc::new(service),
            scope: self.scope,
        }))
    }
}

pub struct RequireAuthMiddleware<S> {
    service: Rc<S>,
    scope: AuthScope,
}

/// 提取请求中的 token：优先 `token` 头，其次 Bearer
pub fn extract_token(req: &ServiceRequest) -> Option<String> {
    let headers = req.headers();

    if let Some(token) = headers
        .get(TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return Some(token.to_string());
    }

    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

impl<S, B> RequireAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle unauthorized requests
    fn handle_unauthorized(req: ServiceRequest, message: &str) -> ServiceResponse<EitherBody<B>> {
        info!("Authentication failed for {}: {}", req.path(), message);
        req.into_response(
            HttpResponse::build(StatusCode::UNAUTHORIZED)
                .json(ApiResponse::<()> {
                    success: false,
                    code: ErrorCode::Unauthorized as i32,
                    message: Some(message.to_string()),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    fn validate(jwt: &JwtService, scope: AuthScope, token: &str) -> Option<Claims> {
        let result = match scope {
            AuthScope::User => jwt.validate_user_token(token),
            AuthScope::Admin => jwt.validate_admin_token(token),
        };

        match result {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!("Token validation failed: {}", e);
                None
            }
        }
    }

    /// 当前配置的管理员邮箱（切换凭据后旧 token 立即失效）
    fn configured_admin_email(req: &ServiceRequest) -> String {
        match req.app_data::<web::Data<Arc<UserService>>>() {
            Some(users) => users.admin_email().to_string(),
            None => normalize_email(&crate::config::get_config().auth.admin_email),
        }
    }
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let scope = self.scope;

        Box::pin(async move {
            // CORS preflight 不携带 token
            if req.method() == Method::OPTIONS {
                let response = srv.call(req).await?.map_into_left_body();
                return Ok(response);
            }

            let Some(token) = extract_token(&req) else {
                return Ok(Self::handle_unauthorized(req, MISSING_TOKEN_MESSAGE));
            };

            let claims = match req.app_data::<web::Data<Arc<JwtService>>>() {
                Some(jwt) => Self::validate(jwt, scope, &token),
                None => Self::validate(get_jwt_service(), scope, &token),
            };
            let Some(claims) = claims else {
                return Ok(Self::handle_unauthorized(req, INVALID_TOKEN_MESSAGE));
            };

            match scope {
                AuthScope::User => {
                    trace!("User authenticated: {}", claims.sub);
                    req.extensions_mut().insert(AuthenticatedUser {
                        user_id: claims.sub,
                    });
                }
                AuthScope::Admin => {
                    let admin_email = Self::configured_admin_email(&req);
                    if admin_email.is_empty() || claims.sub != admin_email {
                        return Ok(Self::handle_unauthorized(req, INVALID_TOKEN_MESSAGE));
                    }
                    trace!("Admin authenticated");
                    req.extensions_mut()
                        .insert(AuthenticatedAdmin { email: claims.sub });
                }
            }

            let response = srv.call(req).await?.map_into_left_body();
            Ok(response)
        })
    }
}
