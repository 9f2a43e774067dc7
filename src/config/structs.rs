use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 服务器地址、端口、CPU 数量
/// - database: 数据库连接配置
/// - logging: 日志配置
/// - auth: JWT 与管理员凭据
/// - shop: 币种、运费、店面地址
/// - media: 商品图片存储
/// - payments: Stripe / Razorpay 凭据
/// - cors: 跨域配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub shop: ShopConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub payments: PaymentsConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：ADORNA，分隔符：__
    /// 示例：ADORNA__SERVER__PORT=4000
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("ADORNA")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.trusted_proxies")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 示例配置（`config generate` 使用）
    pub fn sample() -> Self {
        let mut sample = Self::default();
        // 示例中不写入机器相关的 CPU 数量
        sample.server.cpu_count = 4;
        sample
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// 为空时启动期生成随机密钥（重启后旧 token 失效）
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_user_token_days")]
    pub user_token_days: u64,
    #[serde(default = "default_admin_token_hours")]
    pub admin_token_hours: u64,
    #[serde(default)]
    pub admin_email: String,
    /// Argon2 哈希或明文；为空则禁用管理员登录
    #[serde(default)]
    pub admin_password: String,
    /// 可信反向代理（IP 或 CIDR），用于限流时取真实客户端 IP
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
    #[serde(default = "default_login_rate_limit")]
    pub login_rate_limit_per_minute: u32,
}

/// 商店配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_delivery_charge")]
    pub delivery_charge: f64,
    /// 请求缺少 Origin 时 Stripe 回跳地址使用
    #[serde(default = "default_storefront_url")]
    pub storefront_url: String,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

/// 图片存储后端
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaBackend {
    #[default]
    Local,
    Cloudinary,
}

/// 商品图片存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default)]
    pub backend: MediaBackend,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// 本地存储返回的 URL 前缀
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CloudinaryConfig {
    #[serde(default)]
    pub cloud_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
}

/// 支付网关配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaymentsConfig {
    #[serde(default)]
    pub stripe: StripeConfig,
    #[serde(default)]
    pub razorpay: RazorpayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeConfig {
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_stripe_api_base")]
    pub api_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayConfig {
    #[serde(default)]
    pub key_id: String,
    #[serde(default)]
    pub key_secret: String,
    #[serde(default = "default_razorpay_api_base")]
    pub api_base: String,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_cors_enabled")]
    pub enabled: bool,
    /// 包含 "*" 时允许任意来源
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: usize,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    4000
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "adorna.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_user_token_days() -> u64 {
    7
}

fn default_admin_token_hours() -> u64 {
    12
}

fn default_login_rate_limit() -> u32 {
    30
}

fn default_currency() -> String {
    "inr".to_string()
}

fn default_delivery_charge() -> f64 {
    10.0
}

fn default_storefront_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_max_upload_mb() -> usize {
    10
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_stripe_api_base() -> String {
    "https://api.stripe.com".to_string()
}

fn default_razorpay_api_base() -> String {
    "https://api.razorpay.com".to_string()
}

fn default_cors_enabled() -> bool {
    true
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_cors_max_age() -> usize {
    3600
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            user_token_days: default_user_token_days(),
            admin_token_hours: default_admin_token_hours(),
            admin_email: String::new(),
            admin_password: String::new(),
            trusted_proxies: Vec::new(),
            login_rate_limit_per_minute: default_login_rate_limit(),
        }
    }
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            delivery_charge: default_delivery_charge(),
            storefront_url: default_storefront_url(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            backend: MediaBackend::default(),
            upload_dir: default_upload_dir(),
            public_base_url: default_public_base_url(),
            cloudinary: CloudinaryConfig::default(),
        }
    }
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            api_base: default_stripe_api_base(),
        }
    }
}

impl Default for RazorpayConfig {
    fn default() -> Self {
        Self {
            key_id: String::new(),
            key_secret: String::new(),
            api_base: default_razorpay_api_base(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: default_cors_enabled(),
            allowed_origins: default_allowed_origins(),
            max_age: default_cors_max_age(),
        }
    }
}
