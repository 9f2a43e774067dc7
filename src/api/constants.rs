//! API 模块常量定义
//!
//! 包含认证头、上传路径等硬编码常量。

/// 前端携带 token 使用的请求头（storefront 与 admin 面板一致）
pub const TOKEN_HEADER: &str = "token";

/// 本地图片的公开访问路径前缀
pub const UPLOADS_PATH: &str = "/uploads";

/// 超过该耗时的请求以 warn 级别记录
pub const SLOW_REQUEST_MS: u128 = 1000;
