//! 支付网关
//!
//! Stripe Checkout 与 Razorpay Orders 的最小接口。
//! 业务层只依赖 trait，测试中替换为 mock。

mod razorpay;
mod stripe;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::PaymentsConfig;
use crate::errors::Result;

pub use razorpay::{RazorpayClient, is_valid_order_id, sign_payment};
pub use stripe::StripeClient;

/// 金额转换为最小货币单位（分 / 派萨）
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Checkout Session 的一行商品
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutLineItem {
    pub name: String,
    /// 最小货币单位
    pub unit_amount: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSessionRequest {
    pub currency: String,
    pub line_items: Vec<CheckoutLineItem>,
    pub success_url: String,
    pub cancel_url: String,
    /// 本地订单 id，写入 metadata
    pub order_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    /// `paid` / `unpaid` / `no_payment_required`
    #[serde(default)]
    pub payment_status: String,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }
}

#[async_trait]
pub trait StripeApi: Send + Sync {
    async fn create_checkout_session(&self, request: CheckoutSessionRequest)
    -> Result<CheckoutSession>;

    async fn retrieve_checkout_session(&self, session_id: &str) -> Result<CheckoutSession>;
}

/// Razorpay 订单，未知字段原样保留（返回给前端初始化 Checkout）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    /// `created` / `attempted` / `paid`
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RazorpayOrder {
    pub fn is_paid(&self) -> bool {
        self.status == "paid"
    }
}

#[async_trait]
pub trait RazorpayApi: Send + Sync {
    async fn create_order(&self, amount: i64, currency: &str, receipt: &str)
    -> Result<RazorpayOrder>;

    async fn fetch_order(&self, order_id: &str) -> Result<RazorpayOrder>;

    /// 校验 Checkout 回传的 `razorpay_signature`
    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;
}

/// 已配置的网关集合
#[derive(Clone)]
pub struct PaymentGateways {
    pub stripe: Arc<dyn StripeApi>,
    pub razorpay: Arc<dyn RazorpayApi>,
}

impl PaymentGateways {
    pub fn new(stripe: Arc<dyn StripeApi>, razorpay: Arc<dyn RazorpayApi>) -> Self {
        Self { stripe, razorpay }
    }

    pub fn from_config(config: &PaymentsConfig) -> Self {
        Self {
            stripe: Arc::new(StripeClient::new(
                &config.stripe.api_base,
                &config.stripe.secret_key,
            )),
            razorpay: Arc::new(RazorpayClient::new(
                &config.razorpay.api_base,
                &config.razorpay.key_id,
                &config.razorpay.key_secret,
            )),
        }
    }
}
