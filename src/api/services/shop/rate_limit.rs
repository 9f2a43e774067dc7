//! 登录 / 注册限流

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::{HttpResponse, HttpResponseBuilder};
use governor::NotUntil;
use governor::clock::{Clock, DefaultClock, QuantaInstant};
use governor::middleware::NoOpMiddleware;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::AuthConfig;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 无法获取连接地址时共用的 key（测试请求、Unix socket）
const UNKNOWN_PEER_KEY: &str = "unknown";

/// 基于 IP 地址的限流 key 提取器
///
/// 策略：
/// - 默认使用连接 IP（peer_addr），无法被伪造
/// - 如果连接来自配置的可信代理，则使用 X-Forwarded-For
#[derive(Clone)]
pub struct LoginKeyExtractor {
    trusted_proxies: Arc<[String]>,
}

impl LoginKeyExtractor {
    pub fn new(trusted_proxies: &[String]) -> Self {
        Self {
            trusted_proxies: trusted_proxies.into(),
        }
    }
}

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let conn_info = req.connection_info();

        let Some(peer_ip) = conn_info.peer_addr() else {
            return Ok(UNKNOWN_PEER_KEY.to_string());
        };

        if is_trusted_proxy(peer_ip, &self.trusted_proxies) {
            // 来自可信代理，使用 X-Forwarded-For
            let real_ip = conn_info.realip_remote_addr().unwrap_or(peer_ip);
            debug!("Login rate limit key from trusted proxy: {}", real_ip);
            Ok(real_ip.to_string())
        } else {
            Ok(peer_ip.to_string())
        }
    }

    /// 超限时同样返回 JSON 信封
    fn exceed_rate_limit_response(
        &self,
        negative: &NotUntil<QuantaInstant>,
        mut response: HttpResponseBuilder,
    ) -> HttpResponse {
        let wait_time = negative
            .wait_time_from(DefaultClock::default().now())
            .as_secs();
        debug!("Login rate limit exceeded, retry in {}s", wait_time);
        response.json(rate_limited_body(wait_time))
    }
}

fn rate_limited_body(wait_secs: u64) -> ApiResponse<()> {
    ApiResponse {
        success: false,
        code: ErrorCode::RateLimitExceeded as i32,
        message: Some(format!("Too many requests, retry in {}s", wait_secs)),
        data: None,
    }
}

/// 检查 IP 是否在可信代理列表中
pub fn is_trusted_proxy(ip: &str, trusted_proxies: &[String]) -> bool {
    let Ok(ip_addr) = ip.parse::<IpAddr>() else {
        return false;
    };

    trusted_proxies.iter().any(|proxy| {
        if proxy.contains('/') {
            ip_in_cidr(&ip_addr, proxy)
        } else {
            proxy.parse::<IpAddr>().is_ok_and(|p| p == ip_addr)
        }
    })
}

/// CIDR 检查（简易实现）
fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };

    let Ok(prefix_len): Result<u8, _> = prefix_len.parse() else {
        return false;
    };

    let Ok(network_addr) = network.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network_addr) {
        (IpAddr::V4(ip), IpAddr::V4(net)) => {
            if prefix_len > 32 {
                return false;
            }
            let mask = u32::MAX.checked_shl(32 - prefix_len as u32).unwrap_or(0);
            let ip_bits = u32::from_be_bytes(ip.octets());
            let net_bits = u32::from_be_bytes(net.octets());
            (ip_bits & mask) == (net_bits & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) => {
            if prefix_len > 128 {
                return false;
            }
            let mask = u128::MAX.checked_shl(128 - prefix_len as u32).unwrap_or(0);
            let ip_bits = u128::from_be_bytes(ip.octets());
            let net_bits = u128::from_be_bytes(net.octets());
            (ip_bits & mask) == (net_bits & mask)
        }
        _ => false, // IPv4 vs IPv6 不匹配
    }
}

/// 创建账户端点限流器
///
/// 每分钟补充 `login_rate_limit_per_minute` 个令牌，突发同样数量。
/// 超限返回 HTTP 429 Too Many Requests
pub fn auth_rate_limiter(auth: &AuthConfig) -> Governor<LoginKeyExtractor, NoOpMiddleware> {
    let per_minute = auth.login_rate_limit_per_minute.clamp(1, 60_000);
    let period = Duration::from_millis(60_000 / per_minute as u64);

    let config = GovernorConfigBuilder::default()
        .period(period)
        .burst_size(per_minute as u32)
        .key_extractor(LoginKeyExtractor::new(&auth.trusted_proxies))
        .finish()
        .expect("rate limit period and burst are clamped to non-zero values");

    debug!("Auth rate limiter created: {} req/min", per_minute);
    Governor::new(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_body() {
        let json = serde_json::to_value(rate_limited_body(7)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], ErrorCode::RateLimitExceeded as i32);
        assert_eq!(json["message"], "Too many requests, retry in 7s");
    }

    #[test]
    fn test_trusted_proxy_single_ip() {
        let proxies = vec!["10.0.0.1".to_string()];
        assert!(is_trusted_proxy("10.0.0.1", &proxies));
        assert!(!is_trusted_proxy("10.0.0.2", &proxies));
        assert!(!is_trusted_proxy("not-an-ip", &proxies));
    }

    #[test]
    fn test_trusted_proxy_cidr() {
        let proxies = vec!["192.168.1.0/24".to_string(), "fd00::/8".to_string()];
        assert!(is_trusted_proxy("192.168.1.77", &proxies));
        assert!(!is_trusted_proxy("192.168.2.1", &proxies));
        assert!(is_trusted_proxy("fd12::1", &proxies));
        assert!(!is_trusted_proxy("2001:db8::1", &proxies));
    }

    #[test]
    fn test_cidr_rejects_bad_prefix() {
        let ip: IpAddr = "10.1.2.3".parse().unwrap();
        assert!(!ip_in_cidr(&ip, "10.0.0.0/33"));
        assert!(!ip_in_cidr(&ip, "10.0.0.0/x"));
        assert!(ip_in_cidr(&ip, "0.0.0.0/0"));
    }
}
