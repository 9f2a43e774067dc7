//! Razorpay Orders 客户端（JSON REST + Basic Auth）

use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use super::{RazorpayApi, RazorpayOrder};
use crate::errors::{Result, ShopError};
use crate::utils::http::{get_agent, read_json_response, run_blocking, transport_error};

const SERVICE: &str = "Razorpay";

type HmacSha256 = Hmac<Sha256>;

/// Razorpay 订单 id 形如 `order_` + 字母数字
pub fn is_valid_order_id(order_id: &str) -> bool {
    order_id
        .strip_prefix("order_")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_alphanumeric()))
}

/// 计算 `HMAC-SHA256(order_id|payment_id)`，十六进制小写
pub fn sign_payment(order_id: &str, payment_id: &str, key_secret: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(key_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

pub struct RazorpayClient {
    api_base: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    pub fn new(api_base: &str, key_id: &str, key_secret: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            key_id: key_id.to_string(),
            key_secret: key_secret.to_string(),
        }
    }

    fn basic_auth(&self) -> Result<String> {
        if self.key_id.is_empty() || self.key_secret.is_empty() {
            return Err(ShopError::payment_gateway("Razorpay is not configured"));
        }
        let credentials = format!("{}:{}", self.key_id, self.key_secret);
        Ok(format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(credentials)
        ))
    }
}

#[async_trait]
impl RazorpayApi for RazorpayClient {
    async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<RazorpayOrder> {
        let auth = self.basic_auth()?;
        let url = format!("{}/v1/orders", self.api_base);
        let body = serde_json::json!({
            "amount": amount,
            "currency": currency.to_uppercase(),
            "receipt": receipt,
        });

        let order: RazorpayOrder = run_blocking(SERVICE, move || {
            let resp = get_agent()
                .post(&url)
                .header("Authorization", &auth)
                .send_json(&body)
                .map_err(|e| transport_error(SERVICE, e))?;
            read_json_response(SERVICE, resp)
        })
        .await?;

        info!("Razorpay order {} created for receipt {}", order.id, receipt);
        Ok(order)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<RazorpayOrder> {
        if !is_valid_order_id(order_id) {
            return Err(ShopError::validation("Invalid razorpay_order_id"));
        }
        let auth = self.basic_auth()?;
        let url = format!("{}/v1/orders/{}", self.api_base, order_id);

        run_blocking(SERVICE, move || {
            let resp = get_agent()
                .get(&url)
                .header("Authorization", &auth)
                .call()
                .map_err(|e| transport_error(SERVICE, e))?;
            read_json_response(SERVICE, resp)
        })
        .await
    }

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        if self.key_secret.is_empty() {
            warn!("Razorpay signature rejected: key secret not configured");
            return false;
        }
        let expected = sign_payment(order_id, payment_id, &self.key_secret);
        expected.as_bytes().ct_eq(signature.as_bytes()).into()
    }
}
