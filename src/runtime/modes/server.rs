//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    http::Method,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{error, warn};

use crate::api::constants::TOKEN_HEADER;
use crate::api::middleware::{RequestIdMiddleware, TimingMiddleware};
use crate::api::services::shop::{api_root, api_routes, json_config};
use crate::api::services::{UploadDir, health_routes, uploads_routes};
use crate::config::{AuthConfig, CorsConfig, get_config};
use crate::runtime::lifetime::{self, StartupContext};

/// worker 数上限
const MAX_WORKERS: usize = 32;

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsConfig) {
    if !cors_config.enabled {
        return;
    }

    if cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed. \
            Set allowed_origins explicitly or use '[\"*\"]' for any origin."
        );
    }
}

/// Build CORS middleware from configuration
///
/// 店面与管理后台通过 `token` 头携带凭据，不使用 cookie，因此不开启 credentials
fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    // When CORS is disabled, use browser's default same-origin policy (restrictive)
    if !cors_config.enabled {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allowed_methods([Method::GET, Method::POST, Method::HEAD, Method::OPTIONS])
        .allowed_headers(["Content-Type", "Authorization", "Accept", TOKEN_HEADER])
        .expose_headers(["X-Request-ID"])
        .max_age(cors_config.max_age);

    if cors_config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// 注册 app_data 与全部路由（server 与集成测试共用）
pub fn configure_app(cfg: &mut web::ServiceConfig, ctx: &StartupContext, auth: &AuthConfig) {
    cfg.app_data(web::Data::new(ctx.started_at.clone()))
        .app_data(web::Data::new(ctx.storage.clone()))
        .app_data(web::Data::new(ctx.jwt.clone()))
        .app_data(web::Data::new(ctx.user_service.clone()))
        .app_data(web::Data::new(ctx.product_service.clone()))
        .app_data(web::Data::new(ctx.cart_service.clone()))
        .app_data(web::Data::new(ctx.order_service.clone()))
        .app_data(json_config())
        .route("/", web::get().to(api_root))
        .service(health_routes())
        .service(api_routes(auth));

    if let Some(dir) = &ctx.upload_dir {
        cfg.app_data(web::Data::new(UploadDir(dir.clone())))
            .service(uploads_routes());
    }
}

/// Run the HTTP server
///
/// This function:
/// 1. Prepares server components (storage, services, gateways)
/// 2. Configures and starts the HTTP server
/// 3. Listens for graceful shutdown signals
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let startup = lifetime::prepare_startup().await.map_err(|e| {
        error!("Server startup failed: {}", e);
        e
    })?;

    let config = get_config();

    let cpu_count = config.server.cpu_count.clamp(1, MAX_WORKERS);
    warn!("Using {} CPU cores for the server", cpu_count);

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    let auth_config = config.auth.clone();
    if auth_config.trusted_proxies.is_empty() {
        warn!(
            "Login rate limiting uses the connection IP. \
             Configure auth.trusted_proxies when running behind a reverse proxy."
        );
    } else {
        warn!(
            "Login rate limiting: trusted proxies configured: {:?}",
            auth_config.trusted_proxies
        );
    }

    // Clone db reference before storage moves into HttpServer closure
    let db_for_shutdown = startup.storage.get_db().clone();

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        let cors = build_cors_middleware(&cors_config);

        App::new()
            .wrap(TimingMiddleware::default()) // 记录请求延迟
            .wrap(RequestIdMiddleware) // 为每个请求生成 request_id
            .wrap(cors)
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .configure(|cfg| configure_app(cfg, &startup, &auth_config))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_secs(30))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown completed");
        }
    }

    Ok(())
}
