use actix_web::{web, HttpResponse};
use std::path::{Component, Path};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::utils::image::content_type_for;

/// Chemin relatif sans "..", ni racine : reste sous MEDIA_ROOT
fn is_safe_relative(path: &str) -> bool {
    !path.is_empty() && Path::new(path).components().all(|c| matches!(c, Component::Normal(_)))
}

/// GET <MEDIA_URL>{path} - Fichiers uploadés (PUBLIC)
pub async fn serve_media(
    path: web::Path<String>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let relative = path.into_inner();
    if !is_safe_relative(&relative) {
        return Err(ApiError::not_found("File not found"));
    }

    match tokio::fs::read(config.media_root.join(&relative)).await {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .content_type(content_type_for(&relative))
            .body(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ApiError::not_found("File not found")),
        Err(e) => Err(ApiError::Internal(format!("Failed to read media file: {}", e))),
    }
}

pub fn media_routes(cfg: &mut web::ServiceConfig, media_url: &str) {
    cfg.route(
        &format!("{}{{path:.+}}", media_url),
        web::get().to(serve_media),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_safe_relative() {
        assert!(is_safe_relative("recipes/images/a.png"));
        assert!(!is_safe_relative("../secret.txt"));
        assert!(!is_safe_relative("/etc/passwd"));
        assert!(!is_safe_relative("recipes/../../x"));
        assert!(!is_safe_relative(""));
    }
}
