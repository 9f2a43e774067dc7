//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};
use ts_rs::TS;

use crate::errors::ShopError;

use super::types::TS_EXPORT_PATH;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，ts-rs 自动生成 TypeScript 类型。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 商品错误
/// - 4000-4099: 购物车与订单错误
/// - 5000-5099: 支付与上传错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[ts(rename = "ErrorCode")]
#[ts(repr(enum))]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    FileTooLarge = 1011,
    InvalidMultipartData = 1013,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenInvalid = 2002,
    RateLimitExceeded = 2004,
    UserExists = 2010,
    UserNotFound = 2011,

    // 商品错误 3000-3099
    ProductNotFound = 3000,
    ProductInvalid = 3001,

    // 购物车与订单错误 4000-4099
    CartEmpty = 4000,
    OrderNotFound = 4001,
    InvalidOrderStatus = 4002,

    // 支付与上传错误 5000-5099
    PaymentGatewayError = 5000,
    PaymentNotCompleted = 5001,
    PaymentSignatureInvalid = 5002,
    ImageUploadFailed = 5010,
}

impl From<&ShopError> for ErrorCode {
    fn from(err: &ShopError) -> Self {
        match err {
            ShopError::Validation(_) => ErrorCode::BadRequest,
            ShopError::NotFound(_) => ErrorCode::NotFound,
            ShopError::Conflict(_) => ErrorCode::Conflict,
            ShopError::Unauthorized(_) => ErrorCode::AuthFailed,
            ShopError::Token(_) => ErrorCode::TokenInvalid,
            ShopError::PaymentGateway(_) => ErrorCode::PaymentGatewayError,
            ShopError::ImageUpload(_) => ErrorCode::ImageUploadFailed,
            ShopError::ProductNotFound(_) => ErrorCode::ProductNotFound,
            ShopError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            ShopError::UserNotFound(_) => ErrorCode::UserNotFound,
            ShopError::UserExists(_) => ErrorCode::UserExists,
            ShopError::InvalidProduct(_) => ErrorCode::ProductInvalid,
            ShopError::InvalidOrderStatus(_) => ErrorCode::InvalidOrderStatus,
            ShopError::CartEmpty(_) => ErrorCode::CartEmpty,
            ShopError::InvalidSignature(_) => ErrorCode::PaymentSignatureInvalid,
            ShopError::DatabaseConfig(_)
            | ShopError::DatabaseConnection(_)
            | ShopError::DatabaseOperation(_)
            | ShopError::FileOperation(_)
            | ShopError::Serialization(_)
            | ShopError::PasswordHash(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        assert_eq!(
            serde_json::to_string(&ErrorCode::ProductNotFound).unwrap(),
            "3000"
        );
    }

    #[test]
    fn test_from_shop_error() {
        let cases = [
            (ShopError::cart_empty("Cart is empty"), ErrorCode::CartEmpty),
            (
                ShopError::invalid_order_status("Invalid order status: Lost"),
                ErrorCode::InvalidOrderStatus,
            ),
            (
                ShopError::invalid_product("Missing required field: name"),
                ErrorCode::ProductInvalid,
            ),
            (
                ShopError::invalid_signature("Invalid payment signature"),
                ErrorCode::PaymentSignatureInvalid,
            ),
            (ShopError::validation("anything"), ErrorCode::BadRequest),
            (
                ShopError::product_not_found("Product not found"),
                ErrorCode::ProductNotFound,
            ),
            (
                ShopError::user_not_found("User doesn't exist"),
                ErrorCode::UserNotFound,
            ),
            (
                ShopError::user_exists("User already exists"),
                ErrorCode::UserExists,
            ),
            (
                ShopError::unauthorized("Invalid credentials"),
                ErrorCode::AuthFailed,
            ),
            (
                ShopError::payment_gateway("down"),
                ErrorCode::PaymentGatewayError,
            ),
            (
                ShopError::database_operation("boom"),
                ErrorCode::InternalServerError,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ErrorCode::from(&err), expected, "{:?}", err);
        }
    }

    #[test]
    fn test_code_does_not_depend_on_message() {
        assert_eq!(
            ErrorCode::from(&ShopError::validation("Cart is empty")),
            ErrorCode::BadRequest
        );
        assert_eq!(
            ErrorCode::from(&ShopError::cart_empty("Your bag has no items")),
            ErrorCode::CartEmpty
        );
        assert_eq!(
            ErrorCode::from(&ShopError::not_found("Order not found")),
            ErrorCode::NotFound
        );
    }
}
