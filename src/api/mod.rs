//! HTTP 层：JWT、中间件与路由处理

pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod services;
