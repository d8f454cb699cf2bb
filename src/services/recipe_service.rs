use sea_orm::*;
use sea_orm::sea_query::{Expr, Query};
use std::collections::HashSet;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::dto::{
    RecipeIngredientResponse, RecipeResponse, RecipeShortResponse, RecipeWriteRequest,
};
use crate::models::{favorite, ingredient, recipe, recipe_ingredient, recipe_tag, shopping_cart, tag, users};
use crate::services::user_service::UserService;
use crate::utils::image::{self, RECIPE_IMAGES_DIR};
use crate::utils::pagination::Pagination;
use crate::utils::urls::{query_flag, query_value, query_values, MediaLinks};

/// Filtres de GET /api/recipes/
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecipeFilters {
    pub author: Option<i32>,
    pub tags: Vec<String>,      // slugs, au moins un doit correspondre
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeFilters {
    pub fn from_query(pairs: &[(String, String)]) -> Result<Self, ApiError> {
        let author = match query_value(pairs, "author") {
            Some(raw) if !raw.is_empty() => Some(
                raw.parse::<i32>()
                    .map_err(|_| ApiError::validation("Select a valid author"))?,
            ),
            _ => None,
        };

        Ok(Self {
            author,
            tags: query_values(pairs, "tags")
                .into_iter()
                .filter(|slug| !slug.is_empty())
                .map(str::to_string)
                .collect(),
            is_favorited: query_flag(pairs, "is_favorited"),
            is_in_shopping_cart: query_flag(pairs, "is_in_shopping_cart"),
        })
    }
}

/// Les deux listes personnelles de recettes : même forme (user_id, recipe_id)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecipeList {
    Favorite,
    ShoppingCart,
}

impl RecipeList {
    fn recipe_ids_of(self, user_id: i32) -> sea_orm::sea_query::SelectStatement {
        match self {
            RecipeList::Favorite => Query::select()
                .column(favorite::Column::RecipeId)
                .from(favorite::Entity)
                .and_where(favorite::Column::UserId.eq(user_id))
                .to_owned(),
            RecipeList::ShoppingCart => Query::select()
                .column(shopping_cart::Column::RecipeId)
                .from(shopping_cart::Entity)
                .and_where(shopping_cart::Column::UserId.eq(user_id))
                .to_owned(),
        }
    }
}

pub struct RecipeService;

impl RecipeService {
    pub async fn get(db: &DatabaseConnection, recipe_id: i32) -> Result<recipe::Model, ApiError> {
        recipe::Entity::find_by_id(recipe_id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::not_found("Recipe not found"))
    }

    pub async fn exists(db: &DatabaseConnection, recipe_id: i32) -> Result<bool, DbErr> {
        Ok(recipe::Entity::find_by_id(recipe_id).count(db).await? > 0)
    }

    /// Un slug inconnu dans ?tags= est une erreur, pas un filtre vide
    async fn ensure_tags_exist(db: &DatabaseConnection, slugs: &[String]) -> Result<(), ApiError> {
        let known: HashSet<String> = tag::Entity::find()
            .select_only()
            .column(tag::Column::Slug)
            .filter(tag::Column::Slug.is_in(slugs.to_vec()))
            .into_tuple::<String>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        match slugs.iter().find(|slug| !known.contains(*slug)) {
            Some(slug) => Err(ApiError::validation(format!(
                "Select a valid choice. {} is not one of the available choices.",
                slug
            ))),
            None => Ok(()),
        }
    }

    /// Liste filtrée et paginée, la plus récente en premier
    pub async fn list(
        db: &DatabaseConnection,
        viewer: Option<i32>,
        filters: &RecipeFilters,
        pagination: &Pagination,
    ) -> Result<(u64, Vec<recipe::Model>), ApiError> {
        let mut query = recipe::Entity::find();

        if let Some(author_id) = filters.author {
            query = query.filter(recipe::Column::AuthorId.eq(author_id));
        }

        if !filters.tags.is_empty() {
            Self::ensure_tags_exist(db, &filters.tags).await?;
            query = query.filter(
                recipe::Column::Id.in_subquery(
                    Query::select()
                        .column((recipe_tag::Entity, recipe_tag::Column::RecipeId))
                        .from(recipe_tag::Entity)
                        .inner_join(
                            tag::Entity,
                            Expr::col((tag::Entity, tag::Column::Id))
                                .equals((recipe_tag::Entity, recipe_tag::Column::TagId)),
                        )
                        .and_where(tag::Column::Slug.is_in(filters.tags.clone()))
                        .to_owned(),
                ),
            );
        }

        // Ignorés pour un visiteur anonyme
        if let Some(user_id) = viewer {
            if filters.is_favorited {
                query = query.filter(
                    recipe::Column::Id.in_subquery(RecipeList::Favorite.recipe_ids_of(user_id)),
                );
            }
            if filters.is_in_shopping_cart {
                query = query.filter(
                    recipe::Column::Id.in_subquery(RecipeList::ShoppingCart.recipe_ids_of(user_id)),
                );
            }
        }

        let count = query.clone().count(db).await?;
        pagination.ensure_exists(count)?;

        let recipes = query
            .order_by_desc(recipe::Column::CreatedAt)
            .order_by_desc(recipe::Column::Id)
            .offset(pagination.offset())
            .limit(pagination.limit)
            .all(db)
            .await?;

        Ok((count, recipes))
    }

    pub fn to_short(recipe: &recipe::Model, links: &MediaLinks) -> RecipeShortResponse {
        RecipeShortResponse {
            id: recipe.id,
            name: recipe.name.clone(),
            image: links.url(recipe.image.as_deref()),
            cooking_time: recipe.cooking_time,
        }
    }

    /// Représentation complète : auteur, tags, ingrédients, drapeaux du visiteur
    pub async fn to_response(
        db: &DatabaseConnection,
        recipe: &recipe::Model,
        viewer: Option<i32>,
        links: &MediaLinks,
    ) -> Result<RecipeResponse, ApiError> {
        let author = UserService::get(db, recipe.author_id).await?;
        let author = UserService::to_response(db, &author, viewer, links).await?;

        let tags = recipe
            .find_related(tag::Entity)
            .order_by_asc(tag::Column::Name)
            .all(db)
            .await?;

        let ingredients = recipe_ingredient::Entity::find()
            .select_only()
            .column_as(ingredient::Column::Id, "id")
            .column_as(ingredient::Column::Name, "name")
            .column_as(ingredient::Column::MeasurementUnit, "measurement_unit")
            .column_as(recipe_ingredient::Column::Amount, "amount")
            .inner_join(ingredient::Entity)
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe.id))
            .order_by_asc(ingredient::Column::Name)
            .into_model::<RecipeIngredientResponse>()
            .all(db)
            .await?;

        let (is_favorited, is_in_shopping_cart) = match viewer {
            Some(user_id) => (
                Self::in_list(db, RecipeList::Favorite, user_id, recipe.id).await?,
                Self::in_list(db, RecipeList::ShoppingCart, user_id, recipe.id).await?,
            ),
            None => (false, false),
        };

        Ok(RecipeResponse {
            id: recipe.id,
            author,
            name: recipe.name.clone(),
            text: recipe.text.clone(),
            tags,
            ingredients,
            image: links.url(recipe.image.as_deref()),
            cooking_time: recipe.cooking_time,
            is_favorited,
            is_in_shopping_cart,
        })
    }

    // -----------------------------------------------------------------------
    // Écriture
    // -----------------------------------------------------------------------

    /// Vérifie tags et ingrédients : non vides, sans doublon, existants
    async fn validate_links(
        db: &DatabaseConnection,
        request: &RecipeWriteRequest,
    ) -> Result<(), ApiError> {
        if request.tags.is_empty() || request.ingredients.is_empty() {
            return Err(ApiError::validation(
                "A recipe must have at least one tag and one ingredient",
            ));
        }

        let tag_ids: HashSet<i32> = request.tags.iter().copied().collect();
        if tag_ids.len() != request.tags.len() {
            return Err(ApiError::validation("Duplicate tags are not allowed"));
        }

        let ingredient_ids: HashSet<i32> = request.ingredients.iter().map(|i| i.id).collect();
        if ingredient_ids.len() != request.ingredients.len() {
            return Err(ApiError::validation("Duplicate ingredients are not allowed"));
        }

        let known_tags = tag::Entity::find()
            .filter(tag::Column::Id.is_in(tag_ids.iter().copied()))
            .count(db)
            .await?;
        if known_tags as usize != tag_ids.len() {
            return Err(ApiError::validation("Unknown tag id"));
        }

        let known_ingredients = ingredient::Entity::find()
            .filter(ingredient::Column::Id.is_in(ingredient_ids.iter().copied()))
            .count(db)
            .await?;
        if known_ingredients as usize != ingredient_ids.len() {
            return Err(ApiError::validation("Unknown ingredient id"));
        }

        Ok(())
    }

    async fn insert_links<C: ConnectionTrait>(
        conn: &C,
        recipe_id: i32,
        request: &RecipeWriteRequest,
    ) -> Result<(), DbErr> {
        recipe_ingredient::Entity::insert_many(request.ingredients.iter().map(|item| {
            recipe_ingredient::ActiveModel {
                recipe_id: Set(recipe_id),
                ingredient_id: Set(item.id),
                amount: Set(item.amount),
                ..Default::default()
            }
        }))
        .exec(conn)
        .await?;

        recipe_tag::Entity::insert_many(request.tags.iter().map(|tag_id| recipe_tag::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(*tag_id),
            ..Default::default()
        }))
        .exec(conn)
        .await?;

        Ok(())
    }

    pub fn ensure_can_edit(user: &users::Model, recipe: &recipe::Model) -> Result<(), ApiError> {
        if recipe.author_id == user.id || user.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "You do not have permission to modify this recipe".to_string(),
            ))
        }
    }

    /// Création : image obligatoire, recette + liaisons dans une transaction
    pub async fn create(
        db: &DatabaseConnection,
        config: &AppConfig,
        author: &users::Model,
        request: RecipeWriteRequest,
    ) -> Result<recipe::Model, ApiError> {
        let image_data = request
            .image
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ApiError::validation("Recipe image is required"))?;

        Self::validate_links(db, &request).await?;

        let image_path = image::save_data_url(&config.media_root, RECIPE_IMAGES_DIR, image_data).await?;

        let result = async {
            let txn = db.begin().await?;

            let created = recipe::ActiveModel {
                author_id: Set(author.id),
                name: Set(request.name.clone()),
                image: Set(Some(image_path.clone())),
                text: Set(request.text.clone()),
                cooking_time: Set(request.cooking_time),
                created_at: Set(chrono::Utc::now()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            Self::insert_links(&txn, created.id, &request).await?;
            txn.commit().await?;

            Ok::<_, DbErr>(created)
        }
        .await;

        match result {
            Ok(created) => {
                tracing::info!(recipe_id = created.id, author_id = author.id, "recipe created");
                Ok(created)
            }
            Err(e) => {
                image::remove_media(&config.media_root, &image_path).await;
                Err(e.into())
            }
        }
    }

    /// Mise à jour complète ; l'image est optionnelle (l'existante est conservée)
    pub async fn update(
        db: &DatabaseConnection,
        config: &AppConfig,
        user: &users::Model,
        recipe_id: i32,
        request: RecipeWriteRequest,
    ) -> Result<recipe::Model, ApiError> {
        let existing = Self::get(db, recipe_id).await?;
        Self::ensure_can_edit(user, &existing)?;
        Self::validate_links(db, &request).await?;

        let new_image = match request.image.as_deref().filter(|value| !value.trim().is_empty()) {
            Some(data) => Some(image::save_data_url(&config.media_root, RECIPE_IMAGES_DIR, data).await?),
            None => None,
        };
        let old_image = existing.image.clone();

        let result = async {
            let txn = db.begin().await?;

            let mut active_model: recipe::ActiveModel = existing.into();
            active_model.name = Set(request.name.clone());
            active_model.text = Set(request.text.clone());
            active_model.cooking_time = Set(request.cooking_time);
            if let Some(path) = &new_image {
                active_model.image = Set(Some(path.clone()));
            }
            let updated = active_model.update(&txn).await?;

            recipe_ingredient::Entity::delete_many()
                .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
                .exec(&txn)
                .await?;
            recipe_tag::Entity::delete_many()
                .filter(recipe_tag::Column::RecipeId.eq(recipe_id))
                .exec(&txn)
                .await?;
            Self::insert_links(&txn, recipe_id, &request).await?;

            txn.commit().await?;
            Ok::<_, DbErr>(updated)
        }
        .await;

        match result {
            Ok(updated) => {
                if let (Some(_), Some(old)) = (&new_image, old_image) {
                    image::remove_media(&config.media_root, &old).await;
                }
                Ok(updated)
            }
            Err(e) => {
                if let Some(path) = &new_image {
                    image::remove_media(&config.media_root, path).await;
                }
                Err(e.into())
            }
        }
    }

    /// Suppression (les liaisons partent en cascade)
    pub async fn delete(
        db: &DatabaseConnection,
        config: &AppConfig,
        user: &users::Model,
        recipe_id: i32,
    ) -> Result<(), ApiError> {
        let existing = Self::get(db, recipe_id).await?;
        Self::ensure_can_edit(user, &existing)?;

        let image_path = existing.image.clone();
        existing.delete(db).await?;

        if let Some(path) = image_path {
            image::remove_media(&config.media_root, &path).await;
        }

        tracing::info!(recipe_id, user_id = user.id, "recipe deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Favoris / liste de courses
    // -----------------------------------------------------------------------

    pub async fn in_list(
        db: &DatabaseConnection,
        list: RecipeList,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, DbErr> {
        let count = match list {
            RecipeList::Favorite => {
                favorite::Entity::find()
                    .filter(favorite::Column::UserId.eq(user_id))
                    .filter(favorite::Column::RecipeId.eq(recipe_id))
                    .count(db)
                    .await?
            }
            RecipeList::ShoppingCart => {
                shopping_cart::Entity::find()
                    .filter(shopping_cart::Column::UserId.eq(user_id))
                    .filter(shopping_cart::Column::RecipeId.eq(recipe_id))
                    .count(db)
                    .await?
            }
        };
        Ok(count > 0)
    }

    /// Ajoute la recette ; un doublon (même concurrent) donne "already added"
    pub async fn add_to_list(
        db: &DatabaseConnection,
        list: RecipeList,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<recipe::Model, ApiError> {
        const ALREADY_ADDED: &str = "Recipe already added";

        let recipe = Self::get(db, recipe_id).await?;

        if Self::in_list(db, list, user_id, recipe.id).await? {
            return Err(ApiError::validation(ALREADY_ADDED));
        }

        let inserted = match list {
            RecipeList::Favorite => favorite::ActiveModel {
                user_id: Set(user_id),
                recipe_id: Set(recipe.id),
                ..Default::default()
            }
            .insert(db)
            .await
            .map(|_| ()),
            RecipeList::ShoppingCart => shopping_cart::ActiveModel {
                user_id: Set(user_id),
                recipe_id: Set(recipe.id),
                ..Default::default()
            }
            .insert(db)
            .await
            .map(|_| ()),
        };
        inserted.map_err(|e| ApiError::from_insert(e, ALREADY_ADDED))?;

        tracing::debug!(?list, user_id, recipe_id, "recipe added to list");
        Ok(recipe)
    }

    pub async fn remove_from_list(
        db: &DatabaseConnection,
        list: RecipeList,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<(), ApiError> {
        let recipe = Self::get(db, recipe_id).await?;

        let result = match list {
            RecipeList::Favorite => {
                favorite::Entity::delete_many()
                    .filter(favorite::Column::UserId.eq(user_id))
                    .filter(favorite::Column::RecipeId.eq(recipe.id))
                    .exec(db)
                    .await?
            }
            RecipeList::ShoppingCart => {
                shopping_cart::Entity::delete_many()
                    .filter(shopping_cart::Column::UserId.eq(user_id))
                    .filter(shopping_cart::Column::RecipeId.eq(recipe.id))
                    .exec(db)
                    .await?
            }
        };

        if result.rows_affected == 0 {
            return Err(ApiError::validation("Recipe is not in the list"));
        }

        Ok(())
    }

    /// Ids des recettes d'une liste, utilisé par la liste de courses
    pub fn list_subquery(list: RecipeList, user_id: i32) -> sea_orm::sea_query::SelectStatement {
        list.recipe_ids_of(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(query: &[(&str, &str)]) -> Vec<(String, String)> {
        query
            .iter()
            .map(|(k, v)| (ToString::to_string(k), ToString::to_string(v)))
            .collect()
    }

    #[test]
    fn test_filters_from_query() {
        let filters = RecipeFilters::from_query(&pairs(&[
            ("author", "7"),
            ("tags", "breakfast"),
            ("tags", "lunch"),
            ("is_favorited", "1"),
            ("is_in_shopping_cart", "0"),
        ]))
        .unwrap();

        assert_eq!(
            filters,
            RecipeFilters {
                author: Some(7),
                tags: vec!["breakfast".to_string(), "lunch".to_string()],
                is_favorited: true,
                is_in_shopping_cart: false,
            }
        );
    }

    #[test]
    fn test_invalid_author_filter() {
        assert!(RecipeFilters::from_query(&pairs(&[("author", "abc")])).is_err());
        assert_eq!(
            RecipeFilters::from_query(&pairs(&[("author", "")])).unwrap(),
            RecipeFilters::default()
        );
    }

    #[test]
    fn test_ensure_can_edit() {
        let user = |id: i32, role: &str| users::Model {
            id,
            email: format!("u{}@example.com", id),
            username: format!("u{}", id),
            first_name: "U".to_string(),
            last_name: "V".to_string(),
            password_hash: String::new(),
            avatar: None,
            role: role.to_string(),
            token_version: 0,
        };
        let recipe = recipe::Model {
            id: 1,
            author_id: 1,
            name: "Soup".to_string(),
            image: None,
            text: "Boil".to_string(),
            cooking_time: 10,
            created_at: chrono::Utc::now(),
        };

        assert!(RecipeService::ensure_can_edit(&user(1, users::ROLE_USER), &recipe).is_ok());
        assert!(RecipeService::ensure_can_edit(&user(2, users::ROLE_USER), &recipe).is_err());
        assert!(RecipeService::ensure_can_edit(&user(3, users::ROLE_ADMIN), &recipe).is_ok());
    }
}
