use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::{ImageStore, ImageUpload, image_extension};
use crate::errors::{Result, ShopError};

/// 本地目录图片存储
pub struct LocalImageStore {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    pub fn new(dir: &str, public_base_url: &str) -> Self {
        Self {
            dir: PathBuf::from(dir),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn upload(&self, image: ImageUpload) -> Result<String> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            ShopError::image_upload(format!(
                "无法创建上传目录 {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        // 文件名只由服务端生成，客户端文件名不参与路径
        let file_name = format!(
            "{}.{}",
            uuid::Uuid::new_v4().simple(),
            image_extension(&image.file_name, &image.content_type)
        );
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, &image.bytes).await.map_err(|e| {
            ShopError::image_upload(format!("写入图片 {} 失败: {}", path.display(), e))
        })?;

        debug!("Stored image {} ({} bytes)", file_name, image.bytes.len());
        Ok(format!("{}/uploads/{}", self.public_base_url, file_name))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_writes_file_and_returns_url() {
        let dir = tempfile::TempDir::new().unwrap();
        let upload_dir = dir.path().join("uploads");
        let store = LocalImageStore::new(upload_dir.to_str().unwrap(), "http://cdn.test/");

        let url = store
            .upload(ImageUpload {
                file_name: "shirt.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![0x89, b'P', b'N', b'G'],
            })
            .await
            .unwrap();

        assert!(url.starts_with("http://cdn.test/uploads/"));
        assert!(url.ends_with(".png"));

        let file_name = url.rsplit('/').next().unwrap();
        let written = std::fs::read(upload_dir.join(file_name)).unwrap();
        assert_eq!(written, vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_upload_names_are_unique() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = LocalImageStore::new(dir.path().to_str().unwrap(), "http://x");
        let image = ImageUpload {
            file_name: "a.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![1, 2, 3],
        };

        let a = store.upload(image.clone()).await.unwrap();
        let b = store.upload(image).await.unwrap();
        assert_ne!(a, b);
    }
}
