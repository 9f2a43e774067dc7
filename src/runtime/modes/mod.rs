//! Mode routing
//!
//! 无子命令或 `serve` 时启动 HTTP server，其余子命令由 CLI 处理。

pub mod server;

pub use server::{configure_app, run_server};
