use actix_web::{get, web, HttpRequest, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::ApiError;
use crate::services::catalog_service::CatalogService;
use crate::utils::urls::{query_pairs, query_value};

/// GET /api/ingredients?name=<début du nom> (PUBLIC)
#[get("")]
pub async fn list_ingredients(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let pairs = query_pairs(&req);
    let ingredients = CatalogService::list_ingredients(db.get_ref(), query_value(&pairs, "name")).await?;

    Ok(HttpResponse::Ok().json(ingredients))
}

#[get("/{id}")]
pub async fn get_ingredient(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let ingredient = CatalogService::get_ingredient(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ingredient))
}

pub fn ingredients_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/ingredients")
            .service(list_ingredients)
            .service(get_ingredient)
    );
}
