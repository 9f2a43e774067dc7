//! 出站 HTTP 调用（支付网关、图床）
//!
//! ureq 是同步客户端，调用方通过 `run_blocking` 放进 tokio 阻塞线程池。

use std::sync::OnceLock;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::warn;
use ureq::Agent;
use ureq::http::Response;

use crate::errors::{Result, ShopError};

const HTTP_TIMEOUT_SECS: u64 = 20;

/// 全局 HTTP Agent（ureq 的 Agent 是 Send + Sync）
static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

pub fn get_agent() -> &'static Agent {
    HTTP_AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            // 4xx/5xx 也读取 body，用于提取网关错误信息
            .http_status_as_error(false)
            .build()
            .into()
    })
}

/// 在阻塞线程池中执行同步 HTTP 调用
pub async fn run_blocking<T, F>(service: &'static str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        warn!("{} spawn_blocking failed: {}", service, e);
        ShopError::payment_gateway(format!("{} request task failed", service))
    })?
}

/// 将 ureq 传输错误转换为网关错误
pub fn transport_error(service: &str, err: ureq::Error) -> ShopError {
    warn!("{} request failed: {}", service, err);
    ShopError::payment_gateway(format!("{} is unreachable: {}", service, err))
}

/// 读取 JSON 响应；非 2xx 时从 body 中取出网关的错误描述
pub fn read_json_response<T: DeserializeOwned>(
    service: &str,
    resp: Response<ureq::Body>,
) -> Result<T> {
    let status = resp.status();
    let body: serde_json::Value = resp.into_body().read_json().map_err(|e| {
        ShopError::payment_gateway(format!("{} returned an unreadable response: {}", service, e))
    })?;

    if !status.is_success() {
        let detail = gateway_error_message(&body)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        warn!("{} responded with {}: {}", service, status.as_u16(), detail);
        return Err(ShopError::payment_gateway(format!("{}: {}", service, detail)));
    }

    serde_json::from_value(body).map_err(|e| {
        ShopError::payment_gateway(format!("{} response has unexpected shape: {}", service, e))
    })
}

/// 常见网关错误格式：
/// - Stripe: `{"error": {"message": ...}}`
/// - Razorpay: `{"error": {"description": ...}}`
/// - Cloudinary: `{"error": {"message": ...}}`
fn gateway_error_message(body: &serde_json::Value) -> Option<String> {
    let error = body.get("error")?;
    error
        .get("message")
        .or_else(|| error.get("description"))
        .and_then(|v| v.as_str())
        .map(String::from)
        .or_else(|| error.as_str().map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gateway_error_message_shapes() {
        assert_eq!(
            gateway_error_message(&json!({"error": {"message": "No such session"}})),
            Some("No such session".to_string())
        );
        assert_eq!(
            gateway_error_message(&json!({"error": {"code": "BAD_REQUEST_ERROR", "description": "amount too low"}})),
            Some("amount too low".to_string())
        );
        assert_eq!(
            gateway_error_message(&json!({"error": "denied"})),
            Some("denied".to_string())
        );
        assert_eq!(gateway_error_message(&json!({"ok": true})), None);
    }

    #[tokio::test]
    async fn test_run_blocking_propagates_result() {
        let value = run_blocking("test", || Ok(41 + 1)).await.unwrap();
        assert_eq!(value, 42);

        let err = run_blocking::<(), _>("test", || Err(ShopError::validation("nope")))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::Validation(_)));
    }
}
