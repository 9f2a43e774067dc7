//! Shop API 类型定义

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::payments::RazorpayOrder;
use crate::storage::{Cart, Order, Product};

/// 输出目录常量
pub const TS_EXPORT_PATH: &str = "../admin/src/services/types.generated.ts";

/// 统一响应信封：`{success, code, message?, ...data}`
#[derive(Serialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: Option<T>,
}

// ============ 账户 ============

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(default)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TokenResponse {
    pub token: String,
}

// ============ 商品 ============

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(default)]
pub struct RemoveProductRequest {
    pub id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(default, rename_all = "camelCase")]
pub struct SingleProductRequest {
    pub product_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ProductResponse {
    pub product: Product,
}

// ============ 购物车 ============

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(default, rename_all = "camelCase")]
pub struct CartAddRequest {
    pub item_id: String,
    pub size: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(default, rename_all = "camelCase")]
pub struct CartUpdateRequest {
    pub item_id: String,
    pub size: String,
    pub quantity: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart_data: Cart,
}

// ============ 订单 ============

/// 下单请求中的一行；前端会附带完整商品字段，这里只取需要的部分
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct OrderLine {
    #[serde(rename = "_id")]
    pub id: String,
    pub size: String,
    pub quantity: u32,
}

/// `amount` 仅用于对账日志，实际金额由服务端计算
#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(default)]
pub struct PlaceOrderBody {
    pub items: Vec<OrderLine>,
    #[ts(optional)]
    pub amount: Option<f64>,
    #[ts(type = "Record<string, unknown>")]
    pub address: serde_json::Value,
}

/// `success` 兼容字符串 `"true"` 与布尔值
#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(default, rename_all = "camelCase")]
pub struct VerifyStripeBody {
    pub order_id: String,
    #[ts(type = "string | boolean")]
    pub success: serde_json::Value,
}

impl VerifyStripeBody {
    pub fn is_success(&self) -> bool {
        match &self.success {
            serde_json::Value::Bool(b) => *b,
            serde_json::Value::String(s) => s == "true",
            _ => false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(default)]
pub struct VerifyRazorpayBody {
    pub razorpay_order_id: String,
    #[ts(optional)]
    pub razorpay_payment_id: Option<String>,
    #[ts(optional)]
    pub razorpay_signature: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub order_id: String,
    pub status: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct StripeSessionResponse {
    pub session_url: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct RazorpayOrderResponse {
    pub order: RazorpayOrder,
}

// ============ 健康检查相关类型 ============

/// 存储健康检查状态
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HealthChecks {
    pub storage: HealthStorageCheck,
}

/// 健康检查响应
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u32,
    pub checks: HealthChecks,
    pub response_time_ms: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::services::shop::ErrorCode;
    use crate::storage::{OrderItem, OrderStatus, PaymentMethod};

    #[test]
    fn export_typescript_types() {
        // 运行此测试会自动生成 TypeScript 类型文件
        // cargo test export_typescript_types -- --nocapture
        RegisterRequest::export_all(&ts_rs::Config::from_env()).expect("Failed to export RegisterRequest");
        LoginCredentials::export_all(&ts_rs::Config::from_env()).expect("Failed to export LoginCredentials");
        TokenResponse::export_all(&ts_rs::Config::from_env()).expect("Failed to export TokenResponse");
        ProductListResponse::export_all(&ts_rs::Config::from_env()).expect("Failed to export ProductListResponse");
        CartResponse::export_all(&ts_rs::Config::from_env()).expect("Failed to export CartResponse");
        PlaceOrderBody::export_all(&ts_rs::Config::from_env()).expect("Failed to export PlaceOrderBody");
        VerifyStripeBody::export_all(&ts_rs::Config::from_env()).expect("Failed to export VerifyStripeBody");
        VerifyRazorpayBody::export_all(&ts_rs::Config::from_env()).expect("Failed to export VerifyRazorpayBody");
        UpdateStatusRequest::export_all(&ts_rs::Config::from_env()).expect("Failed to export UpdateStatusRequest");
        StripeSessionResponse::export_all(&ts_rs::Config::from_env()).expect("Failed to export StripeSessionResponse");
        OrderItem::export_all(&ts_rs::Config::from_env()).expect("Failed to export OrderItem");
        OrderStatus::export_all(&ts_rs::Config::from_env()).expect("Failed to export OrderStatus");
        PaymentMethod::export_all(&ts_rs::Config::from_env()).expect("Failed to export PaymentMethod");
        HealthResponse::export_all(&ts_rs::Config::from_env()).expect("Failed to export HealthResponse");
        ErrorCode::export_all(&ts_rs::Config::from_env()).expect("Failed to export ErrorCode");

        println!("TypeScript types exported to {}", TS_EXPORT_PATH);
    }

    #[test]
    fn test_envelope_flattens_payload() {
        let body = ApiResponse {
            success: true,
            code: 0,
            message: None,
            data: Some(TokenResponse {
                token: "abc".to_string(),
            }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "code": 0, "token": "abc"})
        );
    }

    #[test]
    fn test_envelope_without_payload() {
        let body = ApiResponse::<TokenResponse> {
            success: false,
            code: 1004,
            message: Some("Product not found".to_string()),
            data: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "code": 1004, "message": "Product not found"})
        );
    }

    #[test]
    fn test_order_body_ignores_extra_item_fields() {
        let body: PlaceOrderBody = serde_json::from_value(serde_json::json!({
            "items": [{"_id": "p1", "name": "Shirt", "price": 5, "size": "M", "quantity": 2}],
            "amount": 20,
            "address": {"city": "Pune"}
        }))
        .unwrap();
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items[0].id, "p1");
        assert_eq!(body.items[0].quantity, 2);
        assert_eq!(body.address["city"], "Pune");
    }

    #[test]
    fn test_verify_stripe_success_flag() {
        let as_string: VerifyStripeBody =
            serde_json::from_value(serde_json::json!({"orderId": "o1", "success": "true"}))
                .unwrap();
        assert!(as_string.is_success());

        let as_bool: VerifyStripeBody =
            serde_json::from_value(serde_json::json!({"orderId": "o1", "success": true})).unwrap();
        assert!(as_bool.is_success());

        let cancelled: VerifyStripeBody =
            serde_json::from_value(serde_json::json!({"orderId": "o1", "success": "false"}))
                .unwrap();
        assert!(!cancelled.is_success());
    }
}
