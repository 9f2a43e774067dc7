//! 商品图片存储
//!
//! - local: 写入本地目录，由 `/uploads/{file}` 提供访问
//! - cloudinary: 签名上传到 Cloudinary，返回 `secure_url`

mod cloudinary;
mod local;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{MediaBackend, MediaConfig};
use crate::errors::Result;

pub use cloudinary::CloudinaryImageStore;
pub use local::LocalImageStore;

/// 待上传的图片
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// 客户端文件名（仅用于推断扩展名）
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// 上传并返回公开 URL
    async fn upload(&self, image: ImageUpload) -> Result<String>;

    fn name(&self) -> &'static str;
}

/// 根据配置创建图片存储
pub fn create_image_store(config: &MediaConfig) -> Arc<dyn ImageStore> {
    let store: Arc<dyn ImageStore> = match config.backend {
        MediaBackend::Local => Arc::new(LocalImageStore::new(
            &config.upload_dir,
            &config.public_base_url,
        )),
        MediaBackend::Cloudinary => Arc::new(CloudinaryImageStore::new(
            &config.cloudinary.cloud_name,
            &config.cloudinary.api_key,
            &config.cloudinary.api_secret,
        )),
    };
    info!("Image store: {}", store.name());
    store
}

/// 推断文件扩展名：优先文件名，其次 content type
pub(crate) fn image_extension(file_name: &str, content_type: &str) -> &'static str {
    let from_name = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match from_name.as_deref() {
        Some("jpg") | Some("jpeg") => "jpg",
        Some("png") => "png",
        Some("webp") => "webp",
        Some("gif") => "gif",
        Some("avif") => "avif",
        Some("svg") => "svg",
        _ => match content_type {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            "image/avif" => "avif",
            "image/svg+xml" => "svg",
            _ => "bin",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("photo.JPEG", "application/octet-stream"), "jpg");
        assert_eq!(image_extension("a.png", "image/jpeg"), "png");
        assert_eq!(image_extension("blob", "image/webp"), "webp");
        assert_eq!(image_extension("", "text/plain"), "bin");
        assert_eq!(image_extension("../../etc/passwd", "image/png"), "png");
    }
}
