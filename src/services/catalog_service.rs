// Tags et ingrédients : lecture publique, écriture réservée à l'admin

use sea_orm::*;

use crate::error::ApiError;
use crate::models::dto::{IngredientRequest, TagRequest};
use crate::models::{ingredient, tag};
use crate::utils::like;

pub struct CatalogService;

impl CatalogService {
    pub async fn list_tags(db: &DatabaseConnection) -> Result<Vec<tag::Model>, DbErr> {
        tag::Entity::find().order_by_asc(tag::Column::Name).all(db).await
    }

    pub async fn get_tag(db: &DatabaseConnection, tag_id: i32) -> Result<tag::Model, ApiError> {
        tag::Entity::find_by_id(tag_id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::not_found("Tag not found"))
    }

    /// `name_prefix` : filtre sensible à la casse sur le début du nom
    pub async fn list_ingredients(
        db: &DatabaseConnection,
        name_prefix: Option<&str>,
    ) -> Result<Vec<ingredient::Model>, DbErr> {
        let mut query = ingredient::Entity::find();

        if let Some(prefix) = name_prefix.filter(|p| !p.is_empty()) {
            query = query.filter(like::starts_with(
                (ingredient::Entity, ingredient::Column::Name),
                prefix,
            ));
        }

        query
            .order_by_asc(ingredient::Column::Name)
            .order_by_asc(ingredient::Column::MeasurementUnit)
            .all(db)
            .await
    }

    pub async fn get_ingredient(
        db: &DatabaseConnection,
        ingredient_id: i32,
    ) -> Result<ingredient::Model, ApiError> {
        ingredient::Entity::find_by_id(ingredient_id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::not_found("Ingredient not found"))
    }

    pub async fn create_tag(db: &DatabaseConnection, request: TagRequest) -> Result<tag::Model, ApiError> {
        tag::ActiveModel {
            name: Set(request.name),
            slug: Set(request.slug),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| ApiError::from_insert(e, "A tag with that name or slug already exists"))
    }

    pub async fn delete_tag(db: &DatabaseConnection, tag_id: i32) -> Result<(), ApiError> {
        let result = tag::Entity::delete_by_id(tag_id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ApiError::not_found("Tag not found"));
        }
        Ok(())
    }

    pub async fn create_ingredient(
        db: &DatabaseConnection,
        request: IngredientRequest,
    ) -> Result<ingredient::Model, ApiError> {
        ingredient::ActiveModel {
            name: Set(request.name),
            measurement_unit: Set(request.measurement_unit),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| ApiError::from_insert(e, "This ingredient already exists with that unit"))
    }

    pub async fn delete_ingredient(db: &DatabaseConnection, ingredient_id: i32) -> Result<(), ApiError> {
        let result = ingredient::Entity::delete_by_id(ingredient_id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ApiError::not_found("Ingredient not found"));
        }
        Ok(())
    }
}
