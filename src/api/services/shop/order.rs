//! 订单与支付端点

use actix_web::http::StatusCode;
use actix_web::http::header::ORIGIN;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::middleware::AuthenticatedUser;
use crate::services::{OrderLineRequest, OrderService, PlaceOrderRequest, VerifyRazorpayRequest};

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_from_shop, json_response, message_response, message_result};
use super::types::{
    OrdersResponse, PlaceOrderBody, RazorpayOrderResponse, StripeSessionResponse,
    UpdateStatusRequest, VerifyRazorpayBody, VerifyStripeBody,
};

impl From<PlaceOrderBody> for PlaceOrderRequest {
    fn from(body: PlaceOrderBody) -> Self {
        Self {
            items: body
                .items
                .into_iter()
                .map(|line| OrderLineRequest {
                    product_id: line.id,
                    size: line.size,
                    quantity: line.quantity,
                })
                .collect(),
            address: body.address,
        }
    }
}

/// 客户端金额只用于诊断日志
fn log_client_amount(body: &PlaceOrderBody) {
    if let Some(amount) = body.amount {
        debug!("Client reported order amount {}", amount);
    }
}

/// 货到付款下单
pub async fn place_order(
    user: web::ReqData<AuthenticatedUser>,
    body: web::Json<PlaceOrderBody>,
    orders: web::Data<Arc<OrderService>>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    log_client_amount(&body);

    match orders.place_cod(&user.user_id, body.into()).await {
        Ok(order) => {
            info!("COD order placed: {} amount={}", order.id, order.amount);
            Ok(message_response("Order Placed"))
        }
        Err(e) => Ok(error_from_shop(&e)),
    }
}

/// Stripe Checkout 下单
pub async fn place_order_stripe(
    req: HttpRequest,
    user: web::ReqData<AuthenticatedUser>,
    body: web::Json<PlaceOrderBody>,
    orders: web::Data<Arc<OrderService>>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    log_client_amount(&body);

    let origin = req.headers().get(ORIGIN).and_then(|h| h.to_str().ok());

    let result = orders
        .place_stripe(&user.user_id, body.into(), origin)
        .await
        .map(|session_url| StripeSessionResponse { session_url });
    Ok(api_result(result))
}

/// Razorpay 下单
pub async fn place_order_razorpay(
    user: web::ReqData<AuthenticatedUser>,
    body: web::Json<PlaceOrderBody>,
    orders: web::Data<Arc<OrderService>>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    log_client_amount(&body);

    let result = orders
        .place_razorpay(&user.user_id, body.into())
        .await
        .map(|order| RazorpayOrderResponse { order });
    Ok(api_result(result))
}

pub async fn verify_stripe(
    user: web::ReqData<AuthenticatedUser>,
    body: web::Json<VerifyStripeBody>,
    orders: web::Data<Arc<OrderService>>,
) -> ActixResult<impl Responder> {
    let result = orders
        .verify_stripe(&user.user_id, body.order_id.trim(), body.is_success())
        .await;

    Ok(match result {
        Ok(true) => json_response::<()>(StatusCode::OK, true, ErrorCode::Success, None, None),
        Ok(false) => json_response::<()>(
            StatusCode::OK,
            false,
            ErrorCode::PaymentNotCompleted,
            None,
            None,
        ),
        Err(e) => error_from_shop(&e),
    })
}

pub async fn verify_razorpay(
    user: web::ReqData<AuthenticatedUser>,
    body: web::Json<VerifyRazorpayBody>,
    orders: web::Data<Arc<OrderService>>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    let request = VerifyRazorpayRequest {
        razorpay_order_id: body.razorpay_order_id,
        razorpay_payment_id: body.razorpay_payment_id,
        razorpay_signature: body.razorpay_signature,
    };

    Ok(match orders.verify_razorpay(&user.user_id, request).await {
        Ok(true) => message_response("Payment Successful"),
        Ok(false) => json_response::<()>(
            StatusCode::OK,
            false,
            ErrorCode::PaymentNotCompleted,
            Some("Payment Failed".to_string()),
            None,
        ),
        Err(e) => error_from_shop(&e),
    })
}

/// 当前用户的订单（按时间升序）
pub async fn user_orders(
    user: web::ReqData<AuthenticatedUser>,
    orders: web::Data<Arc<OrderService>>,
) -> ActixResult<impl Responder> {
    let result = orders
        .user_orders(&user.user_id)
        .await
        .map(|orders| OrdersResponse { orders });
    Ok(api_result(result))
}

/// 全部订单（管理后台）
pub async fn all_orders(orders: web::Data<Arc<OrderService>>) -> ActixResult<impl Responder> {
    let result = orders
        .all_orders()
        .await
        .map(|orders| OrdersResponse { orders });
    Ok(api_result(result))
}

pub async fn update_status(
    body: web::Json<UpdateStatusRequest>,
    orders: web::Data<Arc<OrderService>>,
) -> ActixResult<impl Responder> {
    let result = orders
        .update_status(body.order_id.trim(), &body.status)
        .await
        .map(|_| ());
    Ok(message_result(result, "Status Updated"))
}
