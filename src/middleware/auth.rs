use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::users;
use crate::utils::jwt;

/// Utilisateur authentifié (ligne users complète).
/// Utilisé comme extracteur dans les routes protégées : 401 si absent ou invalide.
#[derive(Debug, Clone)]
pub struct AuthUser(pub users::Model);

/// Variante pour les routes publiques : None si pas d'en-tête Authorization.
/// Un token présent mais invalide reste une 401.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<users::Model>);

/// Utilisateur authentifié avec le rôle admin : 401 si anonyme, 403 sinon
#[derive(Debug, Clone)]
pub struct AdminUser(pub users::Model);

impl MaybeAuthUser {
    pub fn id(&self) -> Option<i32> {
        self.0.as_ref().map(|user| user.id)
    }
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            authenticate(&req)
                .await?
                .map(AuthUser)
                .ok_or_else(|| {
                    ApiError::Unauthorized("Authentication credentials were not provided".to_string())
                })
        })
    }
}

impl FromRequest for MaybeAuthUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { authenticate(&req).await.map(MaybeAuthUser) })
    }
}

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let auth = AuthUser::from_request(req, payload);
        Box::pin(async move {
            let AuthUser(user) = auth.await?;
            if !user.is_admin() {
                return Err(ApiError::Forbidden(
                    "You do not have permission to perform this action".to_string(),
                ));
            }
            Ok(AdminUser(user))
        })
    }
}

/// Extrait le token de "Token <t>" (format djoser) ou "Bearer <t>"
fn extract_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Token ")
        .or_else(|| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn authenticate(req: &HttpRequest) -> Result<Option<users::Model>, ApiError> {
    // 1. Pas d'en-tête -> anonyme
    let auth_header = match req.headers().get("Authorization") {
        Some(header) => header,
        None => return Ok(None),
    };

    // 2. Format de l'en-tête
    let token = auth_header
        .to_str()
        .ok()
        .and_then(extract_token)
        .ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization format (expected: Token <token>)".to_string())
        })?;

    let config = req
        .app_data::<web::Data<AppConfig>>()
        .ok_or_else(|| ApiError::Internal("AppConfig not registered".to_string()))?;
    let db = req
        .app_data::<web::Data<DatabaseConnection>>()
        .ok_or_else(|| ApiError::Internal("DatabaseConnection not registered".to_string()))?;

    // 3. Signature + expiration
    let claims = jwt::verify_token(&config.jwt_secret, token).map_err(ApiError::Unauthorized)?;

    // 4. L'utilisateur existe toujours et le token n'a pas été révoqué (logout)
    let user = users::Entity::find_by_id(claims.sub)
        .one(db.get_ref())
        .await?
        .filter(|user| user.token_version == claims.ver)
        .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))?;

    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token("Token abc"), Some("abc"));
        assert_eq!(extract_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_token("Basic abc"), None);
        assert_eq!(extract_token("Token "), None);
    }
}
