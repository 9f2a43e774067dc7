//! 本地图片访问 `GET /uploads/{file}`

use actix_web::{HttpResponse, Responder, web};
use std::path::PathBuf;
use tracing::{debug, error};

use crate::api::constants::UPLOADS_PATH;

/// 本地图片目录
#[derive(Clone, Debug)]
pub struct UploadDir(pub PathBuf);

/// 只允许 `[A-Za-z0-9._-]` 且不以 `.` 开头，杜绝目录穿越
fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 128
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn content_type_for(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

pub async fn serve_upload(
    path: web::Path<String>,
    dir: web::Data<UploadDir>,
) -> impl Responder {
    let name = path.into_inner();

    if !is_safe_file_name(&name) {
        debug!("Rejected upload path: {:?}", name);
        return HttpResponse::NotFound().finish();
    }

    match tokio::fs::read(dir.0.join(&name)).await {
        Ok(bytes) => HttpResponse::Ok()
            .append_header(("Content-Type", content_type_for(&name)))
            .append_header(("Cache-Control", "public, max-age=31536000, immutable"))
            .append_header(("X-Content-Type-Options", "nosniff"))
            .body(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => HttpResponse::NotFound().finish(),
        Err(e) => {
            error!("Failed to read upload {}: {}", name, e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn uploads_routes() -> actix_web::Scope {
    web::scope(UPLOADS_PATH).route("/{file}", web::get().to(serve_upload))
}
