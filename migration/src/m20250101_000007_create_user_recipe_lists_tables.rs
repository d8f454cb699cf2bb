use sea_orm_migration::{prelude::*, schema::*};

use super::m20250101_000001_create_users_table::Users;
use super::m20250101_000005_create_recipes_table::Recipes;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Favoris et liste de courses ont exactement la même forme (user, recipe).
fn user_recipe_table<T>(table: T, prefix: &str) -> TableCreateStatement
where
    T: Iden + Copy + 'static,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(pk_auto(UserRecipe::Id))
        .col(integer(UserRecipe::UserId))
        .col(integer(UserRecipe::RecipeId))
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{prefix}_user_id"))
                .from(table, UserRecipe::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{prefix}_recipe_id"))
                .from(table, UserRecipe::RecipeId)
                .to(Recipes::Table, Recipes::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .index(
            Index::create()
                .unique()
                .name(format!("idx_{prefix}_user_recipe_unique"))
                .col(UserRecipe::UserId)
                .col(UserRecipe::RecipeId),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(user_recipe_table(Favorites::Table, "favorites"))
            .await?;
        manager
            .create_table(user_recipe_table(ShoppingCarts::Table, "shopping_carts"))
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ShoppingCarts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Favorites::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UserRecipe {
    Id,
    UserId,
    RecipeId,
}

#[derive(DeriveIden, Clone, Copy)]
pub enum Favorites {
    Table,
}

#[derive(DeriveIden, Clone, Copy)]
pub enum ShoppingCarts {
    Table,
}
