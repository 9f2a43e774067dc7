use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::info;

use super::{ImageStore, ImageUpload};
use crate::errors::{Result, ShopError};
use crate::utils::http::{get_agent, read_json_response, run_blocking};

const SERVICE: &str = "Cloudinary";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Cloudinary 签名上传
pub struct CloudinaryImageStore {
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryImageStore {
    pub fn new(cloud_name: &str, api_key: &str, api_secret: &str) -> Self {
        Self {
            cloud_name: cloud_name.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloud_name
        )
    }
}

/// 参数按 key 排序后拼接 `k=v&k=v`，追加 api_secret 做 SHA-256
fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    async fn upload(&self, image: ImageUpload) -> Result<String> {
        if self.cloud_name.is_empty() || self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(ShopError::image_upload("Cloudinary is not configured"));
        }

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(&[("timestamp", timestamp.clone())], &self.api_secret);
        let data_uri = format!(
            "data:{};base64,{}",
            image.content_type,
            base64::engine::general_purpose::STANDARD.encode(&image.bytes)
        );

        let url = self.upload_url();
        let form = vec![
            ("file".to_string(), data_uri),
            ("api_key".to_string(), self.api_key.clone()),
            ("timestamp".to_string(), timestamp),
            ("signature".to_string(), signature),
            ("signature_algorithm".to_string(), "sha256".to_string()),
        ];

        let response: UploadResponse = run_blocking(SERVICE, move || {
            let resp = get_agent().post(&url).send_form(form).map_err(|e| {
                ShopError::image_upload(format!("Cloudinary is unreachable: {}", e))
            })?;
            read_json_response(SERVICE, resp)
                .map_err(|e| ShopError::image_upload(e.message().to_string()))
        })
        .await?;

        info!("Image uploaded to Cloudinary: {}", response.secure_url);
        Ok(response.secure_url)
    }

    fn name(&self) -> &'static str {
        "cloudinary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_params_sorted() {
        let a = sign_params(
            &[("timestamp", "1".to_string()), ("folder", "x".to_string())],
            "s",
        );
        let b = sign_params(
            &[("folder", "x".to_string()), ("timestamp", "1".to_string())],
            "s",
        );
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_sign_params_known_value() {
        // sha256("timestamp=1315060510abcd")
        assert_eq!(
            sign_params(&[("timestamp", "1315060510".to_string())], "abcd"),
            "5652e549a70bdc03f73a633a23b7d3f3b067d72fff26dd15b25997f46fdf6439"
        );
    }

    #[test]
    fn test_upload_url() {
        let store = CloudinaryImageStore::new("demo", "k", "s");
        assert_eq!(
            store.upload_url(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_store_fails() {
        let store = CloudinaryImageStore::new("", "", "");
        let err = store
            .upload(ImageUpload {
                file_name: "a.png".into(),
                content_type: "image/png".into(),
                bytes: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::ImageUpload(_)));
    }
}
