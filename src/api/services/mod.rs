pub mod health;
pub mod shop;
pub mod uploads;

pub use health::{AppStartTime, HealthService, health_routes};
pub use uploads::{UploadDir, uploads_routes};
