//! 商品目录端点

use actix_multipart::{Field, Multipart};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use futures_util::StreamExt;
use std::sync::Arc;
use tracing::{error, info, trace};

use crate::errors::ShopError;
use crate::media::ImageUpload;
use crate::services::{AddProductRequest, MAX_PRODUCT_IMAGES, ProductService};

use super::error_code::ErrorCode;
use super::helpers::{
    api_result, error_from_shop, error_response, message_response, message_result,
};
use super::types::{
    ProductListResponse, ProductResponse, RemoveProductRequest, SingleProductRequest,
};

/// 文本字段的大小上限
const MAX_TEXT_FIELD_SIZE: usize = 64 * 1024;

enum FieldError {
    TooLarge,
    Read(String),
}

/// 读取字段全部内容（带大小限制）
async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, FieldError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let bytes = chunk.map_err(|e| FieldError::Read(e.to_string()))?;
        if data.len() + bytes.len() > limit {
            return Err(FieldError::TooLarge);
        }
        data.extend_from_slice(&bytes);
    }
    Ok(data)
}

/// `image1`..`image4` → 0..3
fn image_slot(field_name: &str) -> Option<usize> {
    let index: usize = field_name.strip_prefix("image")?.parse().ok()?;
    (1..=MAX_PRODUCT_IMAGES).contains(&index).then(|| index - 1)
}

fn field_error_response(err: FieldError, limit: usize) -> HttpResponse {
    match err {
        FieldError::TooLarge => error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::FileTooLarge,
            &format!("Upload exceeds maximum {} MB", limit / 1024 / 1024),
        ),
        FieldError::Read(e) => {
            error!("Failed to read multipart field: {}", e);
            error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidMultipartData,
                &format!("Invalid multipart data: {}", e),
            )
        }
    }
}

/// 新增商品（multipart 表单）
pub async fn add_product(
    mut payload: Multipart,
    products: web::Data<Arc<ProductService>>,
) -> ActixResult<impl Responder> {
    info!("Shop API: add product request");

    let max_upload = products.max_upload_bytes();
    let mut request = AddProductRequest::default();
    let mut slots: [Option<ImageUpload>; MAX_PRODUCT_IMAGES] = Default::default();

    // 解析 multipart form data
    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to parse multipart field: {}", e);
                return Ok(error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidMultipartData,
                    &format!("Invalid multipart data: {}", e),
                ));
            }
        };

        let field_name = field.name().unwrap_or("").to_string();

        if let Some(slot) = image_slot(&field_name) {
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .unwrap_or("")
                .to_string();
            let content_type = field
                .content_type()
                .map(|m| m.essence_str().to_string())
                .unwrap_or_default();

            let bytes = match read_field(&mut field, max_upload).await {
                Ok(bytes) => bytes,
                Err(e) => return Ok(field_error_response(e, max_upload)),
            };

            // 未选择文件的空 part
            if bytes.is_empty() {
                continue;
            }

            trace!(
                "Received {} ({}, {} bytes)",
                field_name,
                content_type,
                bytes.len()
            );
            slots[slot] = Some(ImageUpload {
                file_name,
                content_type,
                bytes,
            });
            continue;
        }

        let value = match read_field(&mut field, MAX_TEXT_FIELD_SIZE).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).to_string(),
            Err(e) => return Ok(field_error_response(e, MAX_TEXT_FIELD_SIZE)),
        };

        match field_name.as_str() {
            "name" => request.name = value,
            "description" => request.description = value,
            "price" => request.price = value,
            "category" => request.category = value,
            "subCategory" => request.sub_category = value,
            "sizes" => request.sizes = value,
            "bestseller" => request.bestseller = value,
            _ => {
                // 忽略未知字段
            }
        }
    }

    request.images = slots.into_iter().flatten().collect();

    match products.add_product(request).await {
        Ok(product) => {
            info!("Product added: {} ({})", product.name, product.id);
            Ok(message_response("Product Added"))
        }
        Err(e) => Ok(error_from_shop(&e)),
    }
}

pub async fn list_products(
    products: web::Data<Arc<ProductService>>,
) -> ActixResult<impl Responder> {
    let result = products
        .list_products()
        .await
        .map(|products| ProductListResponse { products });
    Ok(api_result(result))
}

pub async fn remove_product(
    body: web::Json<RemoveProductRequest>,
    products: web::Data<Arc<ProductService>>,
) -> ActixResult<impl Responder> {
    let result = if body.id.trim().is_empty() {
        Err(ShopError::validation("Product id is required"))
    } else {
        products.remove_product(body.id.trim()).await
    };
    Ok(message_result(result, "Product Removed"))
}

pub async fn single_product(
    body: web::Json<SingleProductRequest>,
    products: web::Data<Arc<ProductService>>,
) -> ActixResult<impl Responder> {
    let result = products
        .get_product(body.product_id.trim())
        .await
        .map(|product| ProductResponse { product });
    Ok(api_result(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_slot() {
        assert_eq!(image_slot("image1"), Some(0));
        assert_eq!(image_slot("image4"), Some(3));
        assert_eq!(image_slot("image0"), None);
        assert_eq!(image_slot("image5"), None);
        assert_eq!(image_slot("name"), None);
        assert_eq!(image_slot("imagex"), None);
    }
}
