use actix_web::{post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::dto::{LoginRequest, TokenResponse};
use crate::services::user_service::UserService;

/// POST /api/auth/token/login - Obtenir un token (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let auth_token = UserService::login(db.get_ref(), config.get_ref(), &body.email, &body.password).await?;

    Ok(HttpResponse::Ok().json(TokenResponse { auth_token }))
}

/// POST /api/auth/token/logout - Révoquer ses tokens (PROTÉGÉE)
#[post("/logout")]
pub async fn logout(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let user_id = auth_user.0.id;
    UserService::logout(db.get_ref(), auth_user.0).await?;

    tracing::info!(user_id, "user logged out");
    Ok(HttpResponse::NoContent().finish())
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth/token")
            .service(login)
            .service(logout)
    );
}
