use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::jwt::JwtService;
use crate::api::services::AppStartTime;
use crate::config::{MediaBackend, StaticConfig, get_config};
use crate::media::{ImageStore, create_image_store};
use crate::payments::PaymentGateways;
use crate::services::{CartService, OrderService, ProductService, UserService};
use crate::storage::{SeaOrmStorage, StorageFactory};

/// 启动上下文：存储、JWT 与各业务 service
///
/// Server 与 CLI 共用；测试通过 `from_parts` 注入 mock 网关与图片存储。
#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub jwt: Arc<JwtService>,
    pub user_service: Arc<UserService>,
    pub product_service: Arc<ProductService>,
    pub cart_service: Arc<CartService>,
    pub order_service: Arc<OrderService>,
    /// 仅 local 图片存储时由 `/uploads` 提供访问
    pub upload_dir: Option<PathBuf>,
    pub started_at: AppStartTime,
}

impl StartupContext {
    pub fn from_parts(
        storage: Arc<SeaOrmStorage>,
        gateways: PaymentGateways,
        images: Arc<dyn ImageStore>,
        config: &StaticConfig,
    ) -> Self {
        let jwt = Arc::new(JwtService::from_config(&config.auth));

        let upload_dir = match config.media.backend {
            MediaBackend::Local => Some(PathBuf::from(&config.media.upload_dir)),
            MediaBackend::Cloudinary => None,
        };

        Self {
            user_service: Arc::new(UserService::new(storage.clone(), jwt.clone(), &config.auth)),
            product_service: Arc::new(ProductService::new(
                storage.clone(),
                images,
                &config.shop,
            )),
            cart_service: Arc::new(CartService::new(storage.clone())),
            order_service: Arc::new(OrderService::new(
                storage.clone(),
                gateways,
                &config.shop,
            )),
            storage,
            jwt,
            upload_dir,
            started_at: AppStartTime::now(),
        }
    }
}

/// 启动前检查配置，缺失项只告警
fn check_config(config: &StaticConfig) {
    if config.auth.jwt_secret.is_empty() {
        warn!("auth.jwt_secret is empty: tokens will not survive a restart");
    }
    if config.auth.admin_email.is_empty() || config.auth.admin_password.is_empty() {
        warn!("Admin credentials are not configured: admin login is disabled");
    }
    if config.payments.stripe.secret_key.is_empty() {
        warn!("Stripe is not configured: /api/order/stripe will fail");
    }
    if config.payments.razorpay.key_id.is_empty() || config.payments.razorpay.key_secret.is_empty()
    {
        warn!("Razorpay is not configured: /api/order/razorpay will fail");
    }
}

/// 准备启动上下文
/// 包括存储、支付网关与图片存储
pub async fn prepare_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = get_config();
    check_config(&config);

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());
    match storage.count_users().await {
        Ok(count) => info!("Registered users: {}", count),
        Err(e) => warn!("Failed to count users: {}", e),
    }

    let images = create_image_store(&config.media);
    if config.media.backend == MediaBackend::Local {
        tokio::fs::create_dir_all(&config.media.upload_dir)
            .await
            .with_context(|| format!("Failed to create upload dir {}", config.media.upload_dir))?;
    }

    let gateways = PaymentGateways::from_config(&config.payments);
    let ctx = StartupContext::from_parts(storage, gateways, images, &config);

    debug!("Pre-startup completed in {:?}", start_time.elapsed());
    Ok(ctx)
}
