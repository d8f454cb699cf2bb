use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::middleware::{AuthUser, MaybeAuthUser};
use crate::models::dto::{
    AvatarRequest, AvatarResponse, RegisterRequest, SetPasswordRequest, UserCreatedResponse,
};
use crate::services::user_service::{recipes_limit, UserService};
use crate::utils::pagination::Pagination;
use crate::utils::urls::{query_pairs, MediaLinks};

/// POST /api/users - Inscription (PUBLIC)
#[post("")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    let user = UserService::register(db.get_ref(), body).await?;

    Ok(HttpResponse::Created().json(UserCreatedResponse {
        email: user.email,
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
    }))
}

/// GET /api/users - Liste paginée (PUBLIC)
#[get("")]
pub async fn list_users(
    req: HttpRequest,
    viewer: MaybeAuthUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let pagination = Pagination::from_query(&query_pairs(&req))?;
    let links = MediaLinks::new(&req, &config.media_url);

    let (count, users) = UserService::list(db.get_ref(), &pagination).await?;

    let mut results = Vec::with_capacity(users.len());
    for user in &users {
        results.push(UserService::to_response(db.get_ref(), user, viewer.id(), &links).await?);
    }

    Ok(HttpResponse::Ok().json(pagination.wrap(&req, count, results)))
}

/// GET /api/users/me - Profil courant (PROTÉGÉE)
#[get("/me")]
pub async fn me(
    req: HttpRequest,
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let links = MediaLinks::new(&req, &config.media_url);
    let user = &auth_user.0;

    let response = UserService::to_response(db.get_ref(), user, Some(user.id), &links).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/users/me/avatar - Remplacer l'avatar (PROTÉGÉE)
#[put("/me/avatar")]
pub async fn set_avatar(
    req: HttpRequest,
    auth_user: AuthUser,
    body: web::Json<AvatarRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let links = MediaLinks::new(&req, &config.media_url);

    let user = UserService::set_avatar(
        db.get_ref(),
        config.get_ref(),
        auth_user.0,
        body.avatar.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(AvatarResponse {
        avatar: links.url(user.avatar.as_deref()),
    }))
}

/// DELETE /api/users/me/avatar - Supprimer l'avatar (PROTÉGÉE)
#[delete("/me/avatar")]
pub async fn delete_avatar(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    UserService::delete_avatar(db.get_ref(), config.get_ref(), auth_user.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/users/set_password - Changer son mot de passe (PROTÉGÉE)
#[post("/set_password")]
pub async fn set_password(
    auth_user: AuthUser,
    body: web::Json<SetPasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    UserService::set_password(db.get_ref(), auth_user.0, body).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/users/subscriptions - Auteurs suivis + leurs recettes (PROTÉGÉE)
#[get("/subscriptions")]
pub async fn subscriptions(
    req: HttpRequest,
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let pairs = query_pairs(&req);
    let pagination = Pagination::from_query(&pairs)?;
    let limit = recipes_limit(&pairs);
    let links = MediaLinks::new(&req, &config.media_url);
    let viewer_id = auth_user.0.id;

    let (count, authors) = UserService::list_subscriptions(db.get_ref(), viewer_id, &pagination).await?;

    let mut results = Vec::with_capacity(authors.len());
    for author in &authors {
        results.push(
            UserService::subscription_response(db.get_ref(), author, Some(viewer_id), limit, &links)
                .await?,
        );
    }

    Ok(HttpResponse::Ok().json(pagination.wrap(&req, count, results)))
}

/// GET /api/users/{id} - Profil public (PUBLIC)
#[get("/{id}")]
pub async fn get_user(
    req: HttpRequest,
    path: web::Path<i32>,
    viewer: MaybeAuthUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let links = MediaLinks::new(&req, &config.media_url);
    let user = UserService::get(db.get_ref(), path.into_inner()).await?;

    let response = UserService::to_response(db.get_ref(), &user, viewer.id(), &links).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/users/{id}/subscribe - S'abonner (PROTÉGÉE)
#[post("/{id}/subscribe")]
pub async fn subscribe(
    req: HttpRequest,
    path: web::Path<i32>,
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let links = MediaLinks::new(&req, &config.media_url);
    let limit = recipes_limit(&query_pairs(&req));
    let viewer_id = auth_user.0.id;

    let author = UserService::subscribe(db.get_ref(), viewer_id, path.into_inner()).await?;
    let response =
        UserService::subscription_response(db.get_ref(), &author, Some(viewer_id), limit, &links).await?;

    Ok(HttpResponse::Created().json(response))
}

/// DELETE /api/users/{id}/subscribe - Se désabonner (PROTÉGÉE)
#[delete("/{id}/subscribe")]
pub async fn unsubscribe(
    path: web::Path<i32>,
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    UserService::unsubscribe(db.get_ref(), auth_user.0.id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn users_routes(cfg: &mut web::ServiceConfig) {
    // Les chemins fixes avant "/{id}"
    cfg.service(
        web::scope("/users")
            .service(register)
            .service(list_users)
            .service(me)
            .service(set_avatar)
            .service(delete_avatar)
            .service(set_password)
            .service(subscriptions)
            .service(get_user)
            .service(subscribe)
            .service(unsubscribe)
    );
}
