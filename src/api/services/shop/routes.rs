//! Shop API 路由配置
//!
//! 按功能模块拆分 `/api` 下的路由。店面与管理后台均使用 POST 调用。

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, error::InternalError, web};

use crate::api::middleware::RequireAuth;
use crate::config::AuthConfig;

use super::cart::{add_to_cart, get_cart, update_cart};
use super::error_code::ErrorCode;
use super::helpers::error_response;
use super::order::{
    all_orders, place_order, place_order_razorpay, place_order_stripe, update_status,
    user_orders, verify_razorpay, verify_stripe,
};
use super::product::{add_product, list_products, remove_product, single_product};
use super::rate_limit::auth_rate_limiter;
use super::user::{admin_login, login, register};

/// JSON 请求体上限
const JSON_LIMIT: usize = 256 * 1024;

/// `GET /`
pub async fn api_root() -> impl Responder {
    HttpResponse::Ok()
        .append_header(("Content-Type", "text/plain; charset=utf-8"))
        .body("API Working")
}

/// JSON 解析失败时返回统一信封
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            let response = error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::BadRequest,
                &format!("Invalid request body: {}", err),
            );
            InternalError::from_response(err, response).into()
        })
}

/// 账户路由 `/user`
///
/// 包含：
/// - POST /user/register - 注册
/// - POST /user/login - 登录
/// - POST /user/admin - 管理员登录
///
/// 三个端点共用按 IP 的限流器
pub fn user_routes(auth: &AuthConfig) -> actix_web::Scope<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + use<>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    web::scope("/user")
        .wrap(auth_rate_limiter(auth))
        .route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/admin", web::post().to(admin_login))
}

/// 商品路由 `/product`
pub fn product_routes() -> actix_web::Scope {
    web::scope("/product")
        .service(
            web::resource("/add")
                .wrap(RequireAuth::admin())
                .route(web::post().to(add_product)),
        )
        .service(
            web::resource("/remove")
                .wrap(RequireAuth::admin())
                .route(web::post().to(remove_product)),
        )
        .route("/single", web::post().to(single_product))
        .route("/list", web::get().to(list_products))
}

/// 购物车路由 `/cart`（全部需要用户 token）
pub fn cart_routes() -> actix_web::Scope<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    web::scope("/cart")
        .wrap(RequireAuth::user())
        .route("/get", web::post().to(get_cart))
        .route("/add", web::post().to(add_to_cart))
        .route("/update", web::post().to(update_cart))
}

/// 订单路由 `/order`
///
/// - 管理员：list、status
/// - 用户：place、stripe、razorpay、userorders、verifyStripe、verifyRazorpay
pub fn order_routes() -> actix_web::Scope {
    let user_resource = |path: &str| web::resource(path.to_string()).wrap(RequireAuth::user());
    let admin_resource = |path: &str| web::resource(path.to_string()).wrap(RequireAuth::admin());

    web::scope("/order")
        .service(admin_resource("/list").route(web::post().to(all_orders)))
        .service(admin_resource("/status").route(web::post().to(update_status)))
        .service(user_resource("/place").route(web::post().to(place_order)))
        .service(user_resource("/stripe").route(web::post().to(place_order_stripe)))
        .service(user_resource("/razorpay").route(web::post().to(place_order_razorpay)))
        .service(user_resource("/userorders").route(web::post().to(user_orders)))
        .service(user_resource("/verifyStripe").route(web::post().to(verify_stripe)))
        .service(user_resource("/verifyRazorpay").route(web::post().to(verify_razorpay)))
}

/// Shop API 路由 `/api`
///
/// 组合所有子模块路由
pub fn api_routes(auth: &AuthConfig) -> actix_web::Scope {
    web::scope("/api")
        .service(user_routes(auth))
        .service(product_routes())
        .service(cart_routes())
        .service(order_routes())
}
