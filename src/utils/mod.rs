pub mod email;
pub mod http;
pub mod password;

pub use email::{is_valid_email, normalize_email};

/// 生成 URL 安全的随机 token（用于兜底 JWT 密钥）
pub fn generate_secure_token(length: usize) -> String {
    use base64::Engine;
    use rand::RngExt;

    let mut bytes = vec![0u8; length];
    rand::rng().fill(&mut bytes[..]);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&bytes)
}

/// 当前时间（毫秒时间戳）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secure_token_is_random() {
        let a = generate_secure_token(32);
        let b = generate_secure_token(32);
        assert_ne!(a, b);
        // 32 字节 base64 无填充 = 43 字符
        assert_eq!(a.len(), 43);
    }

    #[test]
    fn test_now_millis_is_recent() {
        // 2024-01-01 之后
        assert!(now_millis() > 1_704_067_200_000);
    }
}
