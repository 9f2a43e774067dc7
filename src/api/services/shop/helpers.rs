//! Shop API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use tracing::{debug, error};

use crate::errors::ShopError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 内部错误对外文案
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    success: bool,
    code: ErrorCode,
    message: Option<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            success,
            code: code as i32,
            message,
            data,
        })
}

/// 构建成功响应（payload 平铺到信封）
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, true, ErrorCode::Success, None, Some(data))
}

/// 只带提示文案的成功响应，如 "Product Added"
pub fn message_response(message: &str) -> HttpResponse {
    json_response::<()>(
        StatusCode::OK,
        true,
        ErrorCode::Success,
        Some(message.to_string()),
        None,
    )
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, false, error_code, Some(message.to_string()), None)
}

/// 从 ShopError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_shop(err: &ShopError) -> HttpResponse {
    let status = err.http_status();
    let error_code = ErrorCode::from(err);

    if err.is_client_error() {
        debug!("Request rejected: {}", err);
        error_response(status, error_code, err.message())
    } else {
        error!("{}", err.format_colored());
        error_response(status, error_code, INTERNAL_ERROR_MESSAGE)
    }
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + 平铺的 JSON 数据，失败时自动映射 ShopError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<ShopError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: ShopError = e.into();
            error_from_shop(&err)
        }
    }
}

/// 同 `api_result`，成功时只返回提示文案
pub fn message_result<E: Into<ShopError>>(result: Result<(), E>, message: &str) -> HttpResponse {
    match result {
        Ok(()) => message_response(message),
        Err(e) => error_from_shop(&e.into()),
    }
}
