//! 商品目录服务

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ShopConfig;
use crate::errors::{Result, ShopError};
use crate::media::{ImageStore, ImageUpload};
use crate::storage::{NewProduct, Product, SeaOrmStorage};
use crate::utils::now_millis;

/// 每个商品最多图片数（image1..image4）
pub const MAX_PRODUCT_IMAGES: usize = 4;

/// 管理后台表单提交的原始字段（multipart 文本字段）
#[derive(Debug, Clone, Default)]
pub struct AddProductRequest {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub sub_category: String,
    /// JSON 数组字符串，如 `["S","M"]`
    pub sizes: String,
    /// 仅 `"true"` 视为 true
    pub bestseller: String,
    /// 按 image1..image4 顺序
    pub images: Vec<ImageUpload>,
}

impl AddProductRequest {
    /// 校验并解析文本字段（图片 URL 由调用方填充）
    pub fn parse_fields(&self) -> Result<NewProduct> {
        let required = |field: &str, value: &str| -> Result<String> {
            let value = value.trim();
            if value.is_empty() {
                return Err(ShopError::invalid_product(format!(
                    "Missing required field: {}",
                    field
                )));
            }
            Ok(value.to_string())
        };

        let name = required("name", &self.name)?;
        let description = required("description", &self.description)?;
        let category = required("category", &self.category)?;
        let sub_category = required("subCategory", &self.sub_category)?;

        let price: f64 = self
            .price
            .trim()
            .parse()
            .map_err(|_| ShopError::invalid_product("Invalid price"))?;
        if !price.is_finite() || price < 0.0 {
            return Err(ShopError::invalid_product("Invalid price"));
        }

        let sizes: Vec<String> = serde_json::from_str(self.sizes.trim())
            .map_err(|_| ShopError::invalid_product("Invalid sizes: expected a JSON array of strings"))?;

        Ok(NewProduct {
            name,
            description,
            price,
            image: Vec::new(),
            category,
            sub_category,
            sizes,
            bestseller: self.bestseller.trim() == "true",
        })
    }
}

/// 单个上传文件的字节上限
pub fn max_upload_bytes(shop: &ShopConfig) -> usize {
    shop.max_upload_mb.max(1).saturating_mul(1024 * 1024)
}

pub struct ProductService {
    storage: Arc<SeaOrmStorage>,
    images: Arc<dyn ImageStore>,
    max_upload_bytes: usize,
}

impl ProductService {
    pub fn new(storage: Arc<SeaOrmStorage>, images: Arc<dyn ImageStore>, shop: &ShopConfig) -> Self {
        Self {
            storage,
            images,
            max_upload_bytes: max_upload_bytes(shop),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub async fn add_product(&self, req: AddProductRequest) -> Result<Product> {
        let mut new_product = req.parse_fields()?;

        if req.images.is_empty() {
            return Err(ShopError::validation(
                "At least one product image is required",
            ));
        }
        if req.images.len() > MAX_PRODUCT_IMAGES {
            return Err(ShopError::validation(format!(
                "At most {} product images are allowed",
                MAX_PRODUCT_IMAGES
            )));
        }
        if let Some(bad) = req
            .images
            .iter()
            .find(|img| !img.content_type.starts_with("image/"))
        {
            warn!(
                "Rejected product upload with content type {}",
                bad.content_type
            );
            return Err(ShopError::validation("Only image uploads are allowed"));
        }

        for image in req.images {
            let url = self.images.upload(image).await?;
            new_product.image.push(url);
        }

        let product = Product {
            id: uuid::Uuid::new_v4().to_string(),
            name: new_product.name,
            description: new_product.description,
            price: new_product.price,
            image: new_product.image,
            category: new_product.category,
            sub_category: new_product.sub_category,
            sizes: new_product.sizes,
            bestseller: new_product.bestseller,
            date: now_millis(),
        };

        self.storage.insert_product(&product).await?;
        Ok(product)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.storage.list_products().await
    }

    pub async fn get_product(&self, id: &str) -> Result<Product> {
        self.storage
            .get_product(id)
            .await?
            .ok_or_else(|| ShopError::product_not_found("Product not found"))
    }

    pub async fn remove_product(&self, id: &str) -> Result<()> {
        if !self.storage.delete_product(id).await? {
            return Err(ShopError::product_not_found("Product not found"));
        }
        info!("Product removed: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> AddProductRequest {
        AddProductRequest {
            name: " Linen Shirt ".to_string(),
            description: "Breathable".to_string(),
            price: "49.5".to_string(),
            category: "Men".to_string(),
            sub_category: "Topwear".to_string(),
            sizes: r#"["M","L"]"#.to_string(),
            bestseller: "true".to_string(),
            images: Vec::new(),
        }
    }

    #[test]
    fn test_parse_fields_valid() {
        let parsed = valid_request().parse_fields().unwrap();
        assert_eq!(parsed.name, "Linen Shirt");
        assert_eq!(parsed.price, 49.5);
        assert_eq!(parsed.sizes, vec!["M", "L"]);
        assert!(parsed.bestseller);
    }

    #[test]
    fn test_bestseller_only_literal_true() {
        for value in ["false", "TRUE", "1", ""] {
            let req = AddProductRequest {
                bestseller: value.to_string(),
                ..valid_request()
            };
            assert!(!req.parse_fields().unwrap().bestseller, "value {:?}", value);
        }
    }

    #[test]
    fn test_parse_fields_rejects_bad_price() {
        for price in ["abc", "-1", "NaN", ""] {
            let req = AddProductRequest {
                price: price.to_string(),
                ..valid_request()
            };
            assert!(req.parse_fields().is_err(), "price {:?}", price);
        }
    }

    #[test]
    fn test_parse_fields_rejects_bad_sizes() {
        let req = AddProductRequest {
            sizes: "S,M".to_string(),
            ..valid_request()
        };
        assert!(matches!(
            req.parse_fields().unwrap_err(),
            ShopError::InvalidProduct(_)
        ));
    }

    #[test]
    fn test_max_upload_bytes() {
        let shop = |mb| ShopConfig {
            max_upload_mb: mb,
            ..ShopConfig::default()
        };
        assert_eq!(max_upload_bytes(&shop(5)), 5 * 1024 * 1024);
        assert_eq!(max_upload_bytes(&shop(0)), 1024 * 1024);
        assert_eq!(max_upload_bytes(&shop(usize::MAX)), usize::MAX);
    }

    #[test]
    fn test_parse_fields_missing_name() {
        let req = AddProductRequest {
            name: "   ".to_string(),
            ..valid_request()
        };
        let err = req.parse_fields().unwrap_err();
        assert_eq!(err.message(), "Missing required field: name");
    }
}
