use actix_web::http::header;
use actix_web::{get, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::ApiError;
use crate::services::recipe_service::RecipeService;

/// GET /s/{id} - Redirige vers la page de la recette (PUBLIC)
#[get("/s/{id}")]
pub async fn redirect_short_link(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let recipe_id = path.into_inner();
    if !RecipeService::exists(db.get_ref(), recipe_id).await? {
        return Err(ApiError::not_found("Recipe not found"));
    }

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, format!("/recipes/{}/", recipe_id)))
        .finish())
}
