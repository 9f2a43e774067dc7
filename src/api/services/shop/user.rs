//! 账户端点

use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::trace;

use crate::services::{RegisterRequest as NewAccount, UserService};

use super::helpers::api_result;
use super::types::{LoginCredentials, RegisterRequest, TokenResponse};

pub async fn register(
    body: web::Json<RegisterRequest>,
    users: web::Data<Arc<UserService>>,
) -> ActixResult<impl Responder> {
    trace!("Shop API: register request");
    let body = body.into_inner();

    let result = users
        .register(NewAccount {
            name: body.name,
            email: body.email,
            password: body.password,
        })
        .await
        .map(|token| TokenResponse { token });

    Ok(api_result(result))
}

pub async fn login(
    body: web::Json<LoginCredentials>,
    users: web::Data<Arc<UserService>>,
) -> ActixResult<impl Responder> {
    trace!("Shop API: login request");

    let result = users
        .login(&body.email, &body.password)
        .await
        .map(|token| TokenResponse { token });

    Ok(api_result(result))
}

pub async fn admin_login(
    body: web::Json<LoginCredentials>,
    users: web::Data<Arc<UserService>>,
) -> ActixResult<impl Responder> {
    trace!("Shop API: admin login request");

    let result = users
        .admin_login(&body.email, &body.password)
        .await
        .map(|token| TokenResponse { token });

    Ok(api_result(result))
}
