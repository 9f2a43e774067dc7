//! 购物车端点（需用户 token）

use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;

use crate::api::middleware::AuthenticatedUser;
use crate::services::CartService;

use super::helpers::{api_result, message_result};
use super::types::{CartAddRequest, CartResponse, CartUpdateRequest};

pub async fn get_cart(
    user: web::ReqData<AuthenticatedUser>,
    carts: web::Data<Arc<CartService>>,
) -> ActixResult<impl Responder> {
    let result = carts
        .get_cart(&user.user_id)
        .await
        .map(|cart_data| CartResponse { cart_data });
    Ok(api_result(result))
}

pub async fn add_to_cart(
    user: web::ReqData<AuthenticatedUser>,
    body: web::Json<CartAddRequest>,
    carts: web::Data<Arc<CartService>>,
) -> ActixResult<impl Responder> {
    let result = carts
        .add_to_cart(&user.user_id, &body.item_id, &body.size)
        .await
        .map(|_| ());
    Ok(message_result(result, "Added To Cart"))
}

pub async fn update_cart(
    user: web::ReqData<AuthenticatedUser>,
    body: web::Json<CartUpdateRequest>,
    carts: web::Data<Arc<CartService>>,
) -> ActixResult<impl Responder> {
    let result = carts
        .update_cart(&user.user_id, &body.item_id, &body.size, body.quantity)
        .await
        .map(|_| ());
    Ok(message_result(result, "Cart Updated"))
}
