use actix_web::http::header;
use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::middleware::{AuthUser, MaybeAuthUser};
use crate::models::dto::{RecipeWriteRequest, ShortLinkResponse};
use crate::services::recipe_service::{RecipeFilters, RecipeList, RecipeService};
use crate::services::shopping_list_service::{ShoppingListService, SHOPPING_LIST_FILENAME};
use crate::utils::pagination::Pagination;
use crate::utils::urls::{absolute_url, query_pairs, MediaLinks};

/// GET /api/recipes - Liste filtrée et paginée (PUBLIC)
#[get("")]
pub async fn list_recipes(
    req: HttpRequest,
    viewer: MaybeAuthUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let pairs = query_pairs(&req);
    let pagination = Pagination::from_query(&pairs)?;
    let filters = RecipeFilters::from_query(&pairs)?;
    let links = MediaLinks::new(&req, &config.media_url);

    let (count, recipes) = RecipeService::list(db.get_ref(), viewer.id(), &filters, &pagination).await?;

    let mut results = Vec::with_capacity(recipes.len());
    for recipe in &recipes {
        results.push(RecipeService::to_response(db.get_ref(), recipe, viewer.id(), &links).await?);
    }

    Ok(HttpResponse::Ok().json(pagination.wrap(&req, count, results)))
}

/// POST /api/recipes - Créer une recette (PROTÉGÉE)
#[post("")]
pub async fn create_recipe(
    req: HttpRequest,
    auth_user: AuthUser,
    body: web::Json<RecipeWriteRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    let links = MediaLinks::new(&req, &config.media_url);
    let author = auth_user.0;

    let recipe = RecipeService::create(db.get_ref(), config.get_ref(), &author, body).await?;
    let response = RecipeService::to_response(db.get_ref(), &recipe, Some(author.id), &links).await?;

    Ok(HttpResponse::Created().json(response))
}

/// GET /api/recipes/download_shopping_cart - Liste de courses en texte (PROTÉGÉE)
#[get("/download_shopping_cart")]
pub async fn download_shopping_cart(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let content = ShoppingListService::build(db.get_ref(), &auth_user.0).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", SHOPPING_LIST_FILENAME),
        ))
        .body(content))
}

/// GET /api/recipes/{id} - Détail (PUBLIC)
#[get("/{id}")]
pub async fn get_recipe(
    req: HttpRequest,
    path: web::Path<i32>,
    viewer: MaybeAuthUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let links = MediaLinks::new(&req, &config.media_url);
    let recipe = RecipeService::get(db.get_ref(), path.into_inner()).await?;

    let response = RecipeService::to_response(db.get_ref(), &recipe, viewer.id(), &links).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// PATCH /api/recipes/{id} - Modifier (auteur ou admin)
#[patch("/{id}")]
pub async fn update_recipe(
    req: HttpRequest,
    path: web::Path<i32>,
    auth_user: AuthUser,
    body: web::Json<RecipeWriteRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.validate()?;

    let links = MediaLinks::new(&req, &config.media_url);
    let user = auth_user.0;

    let recipe =
        RecipeService::update(db.get_ref(), config.get_ref(), &user, path.into_inner(), body).await?;
    let response = RecipeService::to_response(db.get_ref(), &recipe, Some(user.id), &links).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// DELETE /api/recipes/{id} - Supprimer (auteur ou admin)
#[delete("/{id}")]
pub async fn delete_recipe(
    path: web::Path<i32>,
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    RecipeService::delete(db.get_ref(), config.get_ref(), &auth_user.0, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/recipes/{id}/get-link - Lien court (PUBLIC)
#[get("/{id}/get-link")]
pub async fn get_link(
    req: HttpRequest,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let recipe = RecipeService::get(db.get_ref(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ShortLinkResponse {
        short_link: absolute_url(&req, &format!("/s/{}/", recipe.id)),
    }))
}

// ---------------------------------------------------------------------------
// Favoris / liste de courses : mêmes règles, table différente
// ---------------------------------------------------------------------------

async fn add_to_list(
    req: &HttpRequest,
    list: RecipeList,
    recipe_id: i32,
    auth_user: AuthUser,
    db: &DatabaseConnection,
    config: &AppConfig,
) -> Result<HttpResponse, ApiError> {
    let links = MediaLinks::new(req, &config.media_url);
    let recipe = RecipeService::add_to_list(db, list, auth_user.0.id, recipe_id).await?;

    Ok(HttpResponse::Created().json(RecipeService::to_short(&recipe, &links)))
}

async fn remove_from_list(
    list: RecipeList,
    recipe_id: i32,
    auth_user: AuthUser,
    db: &DatabaseConnection,
) -> Result<HttpResponse, ApiError> {
    RecipeService::remove_from_list(db, list, auth_user.0.id, recipe_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/{id}/favorite")]
pub async fn add_favorite(
    req: HttpRequest,
    path: web::Path<i32>,
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    add_to_list(&req, RecipeList::Favorite, path.into_inner(), auth_user, db.get_ref(), config.get_ref()).await
}

#[delete("/{id}/favorite")]
pub async fn remove_favorite(
    path: web::Path<i32>,
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    remove_from_list(RecipeList::Favorite, path.into_inner(), auth_user, db.get_ref()).await
}

#[post("/{id}/shopping_cart")]
pub async fn add_to_shopping_cart(
    req: HttpRequest,
    path: web::Path<i32>,
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    add_to_list(&req, RecipeList::ShoppingCart, path.into_inner(), auth_user, db.get_ref(), config.get_ref()).await
}

#[delete("/{id}/shopping_cart")]
pub async fn remove_from_shopping_cart(
    path: web::Path<i32>,
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    remove_from_list(RecipeList::ShoppingCart, path.into_inner(), auth_user, db.get_ref()).await
}

pub fn recipes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/recipes")
            .service(list_recipes)
            .service(create_recipe)
            .service(download_shopping_cart)
            .service(get_recipe)
            .service(update_recipe)
            .service(delete_recipe)
            .service(get_link)
            .service(add_favorite)
            .service(remove_favorite)
            .service(add_to_shopping_cart)
            .service(remove_from_shopping_cart)
    );
}
