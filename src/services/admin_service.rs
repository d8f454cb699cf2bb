use sea_orm::*;
use sea_orm::sea_query::Expr;
use std::collections::HashMap;

use crate::models::dto::{AdminRecipeRow, AdminUserRow};
use crate::models::{favorite, recipe, subscription, users};
use crate::utils::like;
use crate::utils::urls::MediaLinks;

pub struct AdminService;

impl AdminService {
    /// COUNT(*) GROUP BY `key` -> HashMap pour un lookup O(1)
    async fn counts_by<E, C>(db: &DatabaseConnection, key: C) -> Result<HashMap<i32, u64>, DbErr>
    where
        E: EntityTrait,
        C: ColumnTrait,
    {
        let rows: Vec<(i32, i64)> = E::find()
            .select_only()
            .column(key)
            .column_as(Expr::col(key).count(), "total")
            .group_by(key)
            .into_tuple()
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, total)| (id, total.max(0) as u64))
            .collect())
    }

    /// Utilisateurs triés par username ; `search` sur username ou email
    pub async fn users(
        db: &DatabaseConnection,
        search: Option<&str>,
        links: &MediaLinks,
    ) -> Result<Vec<AdminUserRow>, DbErr> {
        let mut query = users::Entity::find();
        if let Some(term) = search.filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(like::contains((users::Entity, users::Column::Username), term))
                    .add(like::contains((users::Entity, users::Column::Email), term)),
            );
        }
        let found = query.order_by_asc(users::Column::Username).all(db).await?;

        let recipes_count = Self::counts_by::<recipe::Entity, _>(db, recipe::Column::AuthorId).await?;
        let subscribers_count =
            Self::counts_by::<subscription::Entity, _>(db, subscription::Column::AuthorId).await?;

        Ok(found
            .into_iter()
            .map(|user| AdminUserRow {
                id: user.id,
                full_name: user.full_name(),
                avatar: links.url(user.avatar.as_deref()),
                recipes_count: recipes_count.get(&user.id).copied().unwrap_or(0),
                subscribers_count: subscribers_count.get(&user.id).copied().unwrap_or(0),
                username: user.username,
                email: user.email,
            })
            .collect())
    }

    /// Recettes les plus récentes d'abord ; `search` sur le nom ou le username de l'auteur
    pub async fn recipes(
        db: &DatabaseConnection,
        search: Option<&str>,
    ) -> Result<Vec<AdminRecipeRow>, DbErr> {
        let mut query = recipe::Entity::find().find_also_related(users::Entity);
        if let Some(term) = search.filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(like::contains((recipe::Entity, recipe::Column::Name), term))
                    .add(like::contains((users::Entity, users::Column::Username), term)),
            );
        }
        let found = query
            .order_by_desc(recipe::Column::CreatedAt)
            .order_by_desc(recipe::Column::Id)
            .all(db)
            .await?;

        let favorites_count =
            Self::counts_by::<favorite::Entity, _>(db, favorite::Column::RecipeId).await?;

        Ok(found
            .into_iter()
            .map(|(recipe, author)| AdminRecipeRow {
                id: recipe.id,
                favorites_count: favorites_count.get(&recipe.id).copied().unwrap_or(0),
                author: author.map(|a| a.username).unwrap_or_default(),
                name: recipe.name,
                created_at: recipe.created_at,
            })
            .collect())
    }
}
