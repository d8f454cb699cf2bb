use sea_orm::*;
use sea_orm::sea_query::Expr;

use crate::error::ApiError;
use crate::models::dto::ShoppingListItem;
use crate::models::{ingredient, recipe, recipe_ingredient, users};
use crate::services::recipe_service::{RecipeList, RecipeService};
use crate::utils::shopping_list;

pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

pub struct ShoppingListService;

impl ShoppingListService {
    /// SUM(amount) par ingrédient sur toutes les recettes du panier, trié par nom
    pub async fn aggregate(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<ShoppingListItem>, DbErr> {
        recipe_ingredient::Entity::find()
            .select_only()
            .column_as(ingredient::Column::Name, "name")
            .column_as(ingredient::Column::MeasurementUnit, "measurement_unit")
            .column_as(
                Expr::col((recipe_ingredient::Entity, recipe_ingredient::Column::Amount)).sum(),
                "total_amount",
            )
            .inner_join(ingredient::Entity)
            .filter(
                recipe_ingredient::Column::RecipeId
                    .in_subquery(RecipeService::list_subquery(RecipeList::ShoppingCart, user_id)),
            )
            .group_by(ingredient::Column::Id)
            .group_by(ingredient::Column::Name)
            .group_by(ingredient::Column::MeasurementUnit)
            .order_by_asc(ingredient::Column::Name)
            .order_by_asc(ingredient::Column::MeasurementUnit)
            .into_model::<ShoppingListItem>()
            .all(db)
            .await
    }

    /// Noms des recettes du panier, triés
    pub async fn recipe_names(db: &DatabaseConnection, user_id: i32) -> Result<Vec<String>, DbErr> {
        let recipes = recipe::Entity::find()
            .filter(
                recipe::Column::Id
                    .in_subquery(RecipeService::list_subquery(RecipeList::ShoppingCart, user_id)),
            )
            .order_by_asc(recipe::Column::Name)
            .all(db)
            .await?;

        Ok(recipes.into_iter().map(|r| r.name).collect())
    }

    /// Fichier texte de la liste de courses ; panier vide -> 400
    pub async fn build(db: &DatabaseConnection, user: &users::Model) -> Result<String, ApiError> {
        let recipes = Self::recipe_names(db, user.id).await?;
        if recipes.is_empty() {
            return Err(ApiError::validation("Shopping cart is empty"));
        }

        let items = Self::aggregate(db, user.id).await?;
        let today = chrono::Utc::now().date_naive();

        tracing::debug!(user_id = user.id, ingredients = items.len(), "shopping list built");
        Ok(shopping_list::render(&user.full_name(), today, &items, &recipes))
    }
}
