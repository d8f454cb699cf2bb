// Interface d'administration : réservée au rôle admin (AdminUser -> 403 sinon)

use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::middleware::AdminUser;
use crate::models::dto::{IngredientRequest, TagRequest};
use crate::services::admin_service::AdminService;
use crate::services::catalog_service::CatalogService;
use crate::utils::urls::{query_pairs, query_value, MediaLinks};

/// GET /api/admin/users?search= - Utilisateurs + compteurs
#[get("/users")]
pub async fn admin_users(
    req: HttpRequest,
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let pairs = query_pairs(&req);
    let links = MediaLinks::new(&req, &config.media_url);

    let rows = AdminService::users(db.get_ref(), query_value(&pairs, "search"), &links).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /api/admin/recipes?search= - Recettes + nombre de favoris
#[get("/recipes")]
pub async fn admin_recipes(
    req: HttpRequest,
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let pairs = query_pairs(&req);

    let rows = AdminService::recipes(db.get_ref(), query_value(&pairs, "search")).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("/tags")]
pub async fn create_tag(
    admin: AdminUser,
    body: web::Json<TagRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    let tag = CatalogService::create_tag(db.get_ref(), body).await?;
    tracing::info!(tag_id = tag.id, admin_id = admin.0.id, "tag created");

    Ok(HttpResponse::Created().json(tag))
}

#[delete("/tags/{id}")]
pub async fn delete_tag(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    CatalogService::delete_tag(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/ingredients")]
pub async fn create_ingredient(
    admin: AdminUser,
    body: web::Json<IngredientRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    let ingredient = CatalogService::create_ingredient(db.get_ref(), body).await?;
    tracing::info!(ingredient_id = ingredient.id, admin_id = admin.0.id, "ingredient created");

    Ok(HttpResponse::Created().json(ingredient))
}

#[delete("/ingredients/{id}")]
pub async fn delete_ingredient(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    CatalogService::delete_ingredient(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(admin_users)
            .service(admin_recipes)
            .service(create_tag)
            .service(delete_tag)
            .service(create_ingredient)
            .service(delete_ingredient)
    );
}
