// ============================================================================
// IMAGES BASE64
// ============================================================================
//
// Les images (recettes, avatars) arrivent en JSON sous forme de data URL :
//   data:image/png;base64,iVBORw0KGgo...
//
// On décode, on écrit le fichier sous MEDIA_ROOT/<dossier>/<uuid>.<ext>
// et on stocke en base le chemin relatif ("recipes/images/<uuid>.png").
//
// ============================================================================

use base64::{Engine, engine::general_purpose::STANDARD};
use std::path::Path;
use uuid::Uuid;

use crate::error::ApiError;

pub const RECIPE_IMAGES_DIR: &str = "recipes/images";
pub const AVATARS_DIR: &str = "users/avatars";

#[derive(Debug, PartialEq)]
pub struct DecodedImage {
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

fn extension_for(mime: &str) -> Option<&'static str> {
    match mime {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

pub fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Décode une data URL base64 d'image
pub fn decode_data_url(input: &str) -> Result<DecodedImage, ApiError> {
    let rest = input
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| ApiError::validation("Image must be a base64 data URL"))?;

    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| ApiError::validation("Image must be a base64 data URL"))?;

    let extension = extension_for(mime)
        .ok_or_else(|| ApiError::validation(format!("Unsupported image type: {}", mime)))?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| ApiError::validation("Invalid base64 image payload"))?;

    if bytes.is_empty() {
        return Err(ApiError::validation("Image is empty"));
    }

    Ok(DecodedImage { extension, bytes })
}

/// Décode et enregistre l'image, retourne le chemin relatif à media_root
pub async fn save_data_url(media_root: &Path, dir: &str, input: &str) -> Result<String, ApiError> {
    let image = decode_data_url(input)?;
    let relative = format!("{}/{}.{}", dir, Uuid::new_v4(), image.extension);

    let target = media_root.join(&relative);
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to create media dir: {}", e)))?;
    }

    tokio::fs::write(&target, &image.bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to write image: {}", e)))?;

    tracing::debug!(path = %relative, size = image.bytes.len(), "image saved");

    Ok(relative)
}

/// Supprime un fichier média. Un fichier déjà absent n'est pas une erreur.
pub async fn remove_media(media_root: &Path, relative: &str) {
    if let Err(e) = tokio::fs::remove_file(media_root.join(relative)).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %relative, error = %e, "failed to remove media file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // PNG 1x1 transparent
    pub const PIXEL_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_decode_png() {
        let image = decode_data_url(PIXEL_PNG).unwrap();
        assert_eq!(image.extension, "png");
        assert_eq!(&image.bytes[1..4], b"PNG");
    }

    #[test]
    fn test_reject_plain_base64() {
        assert!(decode_data_url("iVBORw0KGgo=").is_err());
    }

    #[test]
    fn test_reject_unknown_type() {
        assert!(decode_data_url("data:text/plain;base64,aGVsbG8=").is_err());
    }

    #[test]
    fn test_reject_bad_payload() {
        assert!(decode_data_url("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type_for("recipes/images/a.jpg"), "image/jpeg");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let root = std::env::temp_dir().join(format!("foodgram-test-{}", Uuid::new_v4()));

        let relative = save_data_url(&root, AVATARS_DIR, PIXEL_PNG).await.unwrap();
        assert!(relative.starts_with("users/avatars/"));
        assert!(root.join(&relative).exists());

        remove_media(&root, &relative).await;
        assert!(!root.join(&relative).exists());

        let _ = std::fs::remove_dir_all(root);
    }
}
