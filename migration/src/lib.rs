pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users_table;
mod m20250101_000002_create_subscriptions_table;
mod m20250101_000003_create_tags_table;
mod m20250101_000004_create_ingredients_table;
mod m20250101_000005_create_recipes_table;
mod m20250101_000006_create_recipe_links_tables;
mod m20250101_000007_create_user_recipe_lists_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_table::Migration),
            Box::new(m20250101_000002_create_subscriptions_table::Migration),
            Box::new(m20250101_000003_create_tags_table::Migration),
            Box::new(m20250101_000004_create_ingredients_table::Migration),
            Box::new(m20250101_000005_create_recipes_table::Migration),
            Box::new(m20250101_000006_create_recipe_links_tables::Migration),
            Box::new(m20250101_000007_create_user_recipe_lists_tables::Migration),
        ]
    }
}
