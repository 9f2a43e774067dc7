//! Shop API 服务模块
//!
//! 该模块包含店面与管理后台使用的所有端点：
//! - 账户（注册、登录、管理员登录）
//! - 商品目录
//! - 购物车
//! - 订单与支付

pub mod cart;
pub mod error_code;
mod helpers;
pub mod order;
pub mod product;
pub mod rate_limit;
pub mod routes;
pub mod types;
pub mod user;

// 重新导出类型
pub use types::*;

// 重新导出帮助函数
pub use helpers::{
    api_result, error_from_shop, error_response, json_response, message_response, message_result,
    success_response,
};

// 重新导出错误码
pub use error_code::ErrorCode;

pub use routes::{api_root, api_routes, json_config};
