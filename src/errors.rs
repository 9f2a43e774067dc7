use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum ShopError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Serialization(String),
    PasswordHash(String),
    Token(String),
    PaymentGateway(String),
    ImageUpload(String),
    ProductNotFound(String),
    OrderNotFound(String),
    UserNotFound(String),
    UserExists(String),
    InvalidProduct(String),
    InvalidOrderStatus(String),
    CartEmpty(String),
    InvalidSignature(String),
}

impl ShopError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShopError::DatabaseConfig(_) => "E001",
            ShopError::DatabaseConnection(_) => "E002",
            ShopError::DatabaseOperation(_) => "E003",
            ShopError::FileOperation(_) => "E004",
            ShopError::Validation(_) => "E005",
            ShopError::NotFound(_) => "E006",
            ShopError::Conflict(_) => "E007",
            ShopError::Unauthorized(_) => "E008",
            ShopError::Serialization(_) => "E009",
            ShopError::PasswordHash(_) => "E010",
            ShopError::Token(_) => "E011",
            ShopError::PaymentGateway(_) => "E012",
            ShopError::ImageUpload(_) => "E013",
            ShopError::ProductNotFound(_) => "E014",
            ShopError::OrderNotFound(_) => "E015",
            ShopError::UserNotFound(_) => "E016",
            ShopError::UserExists(_) => "E017",
            ShopError::InvalidProduct(_) => "E018",
            ShopError::InvalidOrderStatus(_) => "E019",
            ShopError::CartEmpty(_) => "E020",
            ShopError::InvalidSignature(_) => "E021",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShopError::DatabaseConfig(_) => "Database Configuration Error",
            ShopError::DatabaseConnection(_) => "Database Connection Error",
            ShopError::DatabaseOperation(_) => "Database Operation Error",
            ShopError::FileOperation(_) => "File Operation Error",
            ShopError::Validation(_) => "Validation Error",
            ShopError::NotFound(_) => "Resource Not Found",
            ShopError::Conflict(_) => "Resource Conflict",
            ShopError::Unauthorized(_) => "Unauthorized",
            ShopError::Serialization(_) => "Serialization Error",
            ShopError::PasswordHash(_) => "Password Hash Error",
            ShopError::Token(_) => "Token Error",
            ShopError::PaymentGateway(_) => "Payment Gateway Error",
            ShopError::ImageUpload(_) => "Image Upload Error",
            ShopError::ProductNotFound(_) => "Product Not Found",
            ShopError::OrderNotFound(_) => "Order Not Found",
            ShopError::UserNotFound(_) => "User Not Found",
            ShopError::UserExists(_) => "User Already Exists",
            ShopError::InvalidProduct(_) => "Invalid Product",
            ShopError::InvalidOrderStatus(_) => "Invalid Order Status",
            ShopError::CartEmpty(_) => "Empty Cart",
            ShopError::InvalidSignature(_) => "Invalid Payment Signature",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShopError::DatabaseConfig(msg)
            | ShopError::DatabaseConnection(msg)
            | ShopError::DatabaseOperation(msg)
            | ShopError::FileOperation(msg)
            | ShopError::Validation(msg)
            | ShopError::NotFound(msg)
            | ShopError::Conflict(msg)
            | ShopError::Unauthorized(msg)
            | ShopError::Serialization(msg)
            | ShopError::PasswordHash(msg)
            | ShopError::Token(msg)
            | ShopError::PaymentGateway(msg)
            | ShopError::ImageUpload(msg)
            | ShopError::ProductNotFound(msg)
            | ShopError::OrderNotFound(msg)
            | ShopError::UserNotFound(msg)
            | ShopError::UserExists(msg)
            | ShopError::InvalidProduct(msg)
            | ShopError::InvalidOrderStatus(msg)
            | ShopError::CartEmpty(msg)
            | ShopError::InvalidSignature(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            ShopError::Validation(_)
            | ShopError::InvalidProduct(_)
            | ShopError::InvalidOrderStatus(_)
            | ShopError::CartEmpty(_)
            | ShopError::InvalidSignature(_) => StatusCode::BAD_REQUEST,
            ShopError::NotFound(_)
            | ShopError::ProductNotFound(_)
            | ShopError::OrderNotFound(_)
            | ShopError::UserNotFound(_) => StatusCode::NOT_FOUND,
            ShopError::Conflict(_) | ShopError::UserExists(_) => StatusCode::CONFLICT,
            ShopError::Unauthorized(_) | ShopError::Token(_) => StatusCode::UNAUTHORIZED,
            ShopError::PaymentGateway(_) | ShopError::ImageUpload(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 客户端是否应看到原始信息
    ///
    /// 内部错误只返回通用文案，详情写日志。
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ShopError::Validation(_)
                | ShopError::NotFound(_)
                | ShopError::Conflict(_)
                | ShopError::Unauthorized(_)
                | ShopError::Token(_)
                | ShopError::PaymentGateway(_)
                | ShopError::ProductNotFound(_)
                | ShopError::OrderNotFound(_)
                | ShopError::UserNotFound(_)
                | ShopError::UserExists(_)
                | ShopError::InvalidProduct(_)
                | ShopError::InvalidOrderStatus(_)
                | ShopError::CartEmpty(_)
                | ShopError::InvalidSignature(_)
        )
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShopError {}

// 便捷的构造函数
impl ShopError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ShopError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ShopError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ShopError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ShopError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShopError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShopError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        ShopError::Conflict(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        ShopError::Unauthorized(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShopError::Serialization(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        ShopError::PasswordHash(msg.into())
    }

    pub fn token<T: Into<String>>(msg: T) -> Self {
        ShopError::Token(msg.into())
    }

    pub fn payment_gateway<T: Into<String>>(msg: T) -> Self {
        ShopError::PaymentGateway(msg.into())
    }

    pub fn image_upload<T: Into<String>>(msg: T) -> Self {
        ShopError::ImageUpload(msg.into())
    }

    pub fn product_not_found<T: Into<String>>(msg: T) -> Self {
        ShopError::ProductNotFound(msg.into())
    }

    pub fn order_not_found<T: Into<String>>(msg: T) -> Self {
        ShopError::OrderNotFound(msg.into())
    }

    pub fn user_not_found<T: Into<String>>(msg: T) -> Self {
        ShopError::UserNotFound(msg.into())
    }

    pub fn user_exists<T: Into<String>>(msg: T) -> Self {
        ShopError::UserExists(msg.into())
    }

    pub fn invalid_product<T: Into<String>>(msg: T) -> Self {
        ShopError::InvalidProduct(msg.into())
    }

    pub fn invalid_order_status<T: Into<String>>(msg: T) -> Self {
        ShopError::InvalidOrderStatus(msg.into())
    }

    pub fn cart_empty<T: Into<String>>(msg: T) -> Self {
        ShopError::CartEmpty(msg.into())
    }

    pub fn invalid_signature<T: Into<String>>(msg: T) -> Self {
        ShopError::InvalidSignature(msg.into())
    }
}

impl From<sea_orm::DbErr> for ShopError {
    fn from(err: sea_orm::DbErr) -> Self {
        ShopError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ShopError {
    fn from(err: std::io::Error) -> Self {
        ShopError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ShopError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ShopError::Token(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_unique() {
        let errors = [
            ShopError::database_config(""),
            ShopError::database_connection(""),
            ShopError::database_operation(""),
            ShopError::file_operation(""),
            ShopError::validation(""),
            ShopError::not_found(""),
            ShopError::conflict(""),
            ShopError::unauthorized(""),
            ShopError::serialization(""),
            ShopError::password_hash(""),
            ShopError::token(""),
            ShopError::payment_gateway(""),
            ShopError::image_upload(""),
            ShopError::product_not_found(""),
            ShopError::order_not_found(""),
            ShopError::user_not_found(""),
            ShopError::user_exists(""),
            ShopError::invalid_product(""),
            ShopError::invalid_order_status(""),
            ShopError::cart_empty(""),
            ShopError::invalid_signature(""),
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            ShopError::validation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ShopError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ShopError::conflict("x").http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ShopError::token("x").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ShopError::payment_gateway("x").http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ShopError::order_not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ShopError::user_exists("x").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ShopError::invalid_signature("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ShopError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_are_not_client_errors() {
        assert!(ShopError::validation("bad").is_client_error());
        assert!(!ShopError::database_operation("locked").is_client_error());
        assert!(!ShopError::file_operation("disk").is_client_error());
        assert!(ShopError::cart_empty("Cart is empty").is_client_error());
        assert!(ShopError::user_exists("User already exists").is_client_error());
    }

    #[test]
    fn test_format_simple() {
        let err = ShopError::not_found("Product not found");
        assert_eq!(err.format_simple(), "Resource Not Found: Product not found");
        assert_eq!(err.to_string(), err.format_simple());
    }

    #[test]
    fn test_from_serde_json_error() {
        let err: ShopError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, ShopError::Serialization(_)));
    }
}
