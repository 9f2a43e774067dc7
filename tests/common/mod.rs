//! Shared setup for HTTP integration tests
//!
//! Each test gets its own SQLite file plus mock payment gateways and an
//! in-memory image store.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test::{self, TestRequest};
use actix_web::{App, Error};
use async_trait::async_trait;
use serde_json::{Value, json};
use tempfile::TempDir;

use adorna::config::{DatabaseConfig, StaticConfig};
use adorna::errors::{Result, ShopError};
use adorna::media::{ImageStore, ImageUpload};
use adorna::payments::{
    CheckoutSession, CheckoutSessionRequest, PaymentGateways, RazorpayApi, RazorpayOrder,
    StripeApi, sign_payment,
};
use adorna::runtime::lifetime::StartupContext;
use adorna::runtime::modes::configure_app;
use adorna::storage::SeaOrmStorage;

pub const ADMIN_EMAIL: &str = "admin@adorna.test";
pub const ADMIN_PASSWORD: &str = "admin-pass-123";
pub const RAZORPAY_SECRET: &str = "rzp_test_secret";
pub const DELIVERY_CHARGE: f64 = 10.0;

// =============================================================================
// Mock gateways
// =============================================================================

/// Stripe mock：记录创建请求，session 支付状态可由测试设置
#[derive(Default)]
pub struct MockStripe {
    pub created: Mutex<Vec<CheckoutSessionRequest>>,
    pub payment_status: Mutex<String>,
    pub fail_create: Mutex<bool>,
    pub fail_retrieve: Mutex<bool>,
}

impl MockStripe {
    pub fn set_paid(&self, paid: bool) {
        *self.payment_status.lock().unwrap() = if paid { "paid" } else { "unpaid" }.to_string();
    }
}

#[async_trait]
impl StripeApi for MockStripe {
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession> {
        if *self.fail_create.lock().unwrap() {
            return Err(ShopError::payment_gateway("Stripe is unavailable"));
        }
        let id = format!("cs_test_{}", request.order_id);
        self.created.lock().unwrap().push(request);
        Ok(CheckoutSession {
            url: Some(format!("https://checkout.stripe.test/{}", id)),
            id,
            payment_status: "unpaid".to_string(),
        })
    }

    async fn retrieve_checkout_session(&self, session_id: &str) -> Result<CheckoutSession> {
        if *self.fail_retrieve.lock().unwrap() {
            return Err(ShopError::payment_gateway("Stripe is unavailable"));
        }
        Ok(CheckoutSession {
            id: session_id.to_string(),
            url: None,
            payment_status: self.payment_status.lock().unwrap().clone(),
        })
    }
}

/// Razorpay mock：订单保存在内存，可手动标记为已支付
#[derive(Default)]
pub struct MockRazorpay {
    pub orders: Mutex<Vec<RazorpayOrder>>,
    pub fail_fetch: Mutex<bool>,
}

impl MockRazorpay {
    pub fn mark_paid(&self, order_id: &str) {
        for order in self.orders.lock().unwrap().iter_mut() {
            if order.id == order_id {
                order.status = "paid".to_string();
            }
        }
    }
}

#[async_trait]
impl RazorpayApi for MockRazorpay {
    async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<RazorpayOrder> {
        let mut orders = self.orders.lock().unwrap();
        let order = RazorpayOrder {
            id: format!("order_Test{}", orders.len() + 1),
            amount,
            currency: currency.to_uppercase(),
            receipt: Some(receipt.to_string()),
            status: "created".to_string(),
            extra: serde_json::Map::new(),
        };
        orders.push(order.clone());
        Ok(order)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<RazorpayOrder> {
        if *self.fail_fetch.lock().unwrap() {
            return Err(ShopError::payment_gateway("Razorpay is unavailable"));
        }
        self.orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
            .ok_or_else(|| ShopError::payment_gateway("The id provided does not exist"))
    }

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        sign_payment(order_id, payment_id, RAZORPAY_SECRET) == signature
    }
}

/// 内存图片存储
#[derive(Default)]
pub struct MemoryImageStore {
    pub uploads: Mutex<Vec<ImageUpload>>,
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn upload(&self, image: ImageUpload) -> Result<String> {
        let mut uploads = self.uploads.lock().unwrap();
        let url = format!("https://img.adorna.test/{}-{}", uploads.len(), image.file_name);
        uploads.push(image);
        Ok(url)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

// =============================================================================
// Test environment
// =============================================================================

pub struct TestEnv {
    pub ctx: StartupContext,
    pub config: StaticConfig,
    pub stripe: Arc<MockStripe>,
    pub razorpay: Arc<MockRazorpay>,
    pub images: Arc<MemoryImageStore>,
    _dir: TempDir,
}

pub fn test_config() -> StaticConfig {
    let mut config = StaticConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.auth.admin_email = ADMIN_EMAIL.to_string();
    config.auth.admin_password = ADMIN_PASSWORD.to_string();
    config.auth.login_rate_limit_per_minute = 1000;
    config.shop.currency = "usd".to_string();
    config.shop.delivery_charge = DELIVERY_CHARGE;
    config.shop.storefront_url = "http://shop.adorna.test".to_string();
    config
}

impl TestEnv {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: StaticConfig) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("adorna_test.db");

        let database = DatabaseConfig {
            database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
            ..DatabaseConfig::default()
        };
        let storage = Arc::new(
            SeaOrmStorage::new(&database)
                .await
                .expect("Failed to create storage"),
        );

        let stripe = Arc::new(MockStripe::default());
        stripe.set_paid(false);
        let razorpay = Arc::new(MockRazorpay::default());
        let images = Arc::new(MemoryImageStore::default());

        let gateways = PaymentGateways::new(stripe.clone(), razorpay.clone());
        let ctx = StartupContext::from_parts(storage, gateways, images.clone(), &config);

        Self {
            ctx,
            config,
            stripe,
            razorpay,
            images,
            _dir: dir,
        }
    }

    pub async fn app(
        &self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = Error>
    {
        let ctx = self.ctx.clone();
        let auth = self.config.auth.clone();
        test::init_service(App::new().configure(move |cfg| configure_app(cfg, &ctx, &auth))).await
    }
}

// =============================================================================
// Request helpers
// =============================================================================

pub async fn call_json<S, B>(app: &S, req: TestRequest) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status().as_u16();
    let body = test::read_body(resp).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

pub async fn post_json<S, B>(app: &S, uri: &str, token: Option<&str>, body: Value) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let mut req = TestRequest::post().uri(uri).set_json(body);
    if let Some(token) = token {
        req = req.insert_header(("token", token));
    }
    call_json(app, req).await
}

pub async fn get_json<S, B>(app: &S, uri: &str) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    call_json(app, TestRequest::get().uri(uri)).await
}

pub async fn register_user<S, B>(app: &S, email: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let (status, body) = post_json(
        app,
        "/api/user/register",
        None,
        json!({ "name": "Test Shopper", "email": email, "password": "shopper-pass-1" }),
    )
    .await;
    assert_eq!(status, 200, "register failed: {}", body);
    body["token"].as_str().expect("token missing").to_string()
}

pub async fn admin_token<S, B>(app: &S) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let (status, body) = post_json(
        app,
        "/api/user/admin",
        None,
        json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(status, 200, "admin login failed: {}", body);
    body["token"].as_str().expect("token missing").to_string()
}

/// 直接写入一个商品，返回 id
pub async fn seed_product(env: &TestEnv, name: &str, price: f64) -> String {
    let product = adorna::storage::Product {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        description: format!("{} description", name),
        price,
        image: vec![format!("https://img.adorna.test/{}.png", name)],
        category: "Women".to_string(),
        sub_category: "Topwear".to_string(),
        sizes: vec!["S".to_string(), "M".to_string()],
        bestseller: false,
        date: 1_700_000_000_000,
    };
    env.ctx
        .storage
        .insert_product(&product)
        .await
        .expect("Failed to seed product");
    product.id
}

pub const MULTIPART_BOUNDARY: &str = "----adorna-test-boundary";

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// 手工拼接 multipart/form-data 请求体
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(uri: &str, token: &str, parts: &[Part<'_>]) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .insert_header(("token", token))
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
        ))
        .set_payload(multipart_body(parts))
}
