// Outils partagés par les tests d'intégration : SQLite en mémoire migrée avec le vrai Migrator

#![allow(dead_code)]

use std::path::PathBuf;

use foodgram::config::AppConfig;
use foodgram::models::dto::{IngredientAmountRequest, RecipeWriteRequest};
use foodgram::models::{ingredient, recipe, tag, users};
use foodgram::services::recipe_service::RecipeService;
use foodgram::utils::jwt;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

pub const PIXEL_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Monte l'application complète (mêmes routes et middlewares que main)
#[macro_export]
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_web::middleware::NormalizePath::trim())
                .app_data(actix_web::web::Data::new($ctx.db.clone()))
                .app_data(actix_web::web::Data::new($ctx.config.clone()))
                .configure(|cfg| foodgram::routes::configure_routes(cfg, &$ctx.config)),
        )
        .await
    };
}

pub struct TestContext {
    pub db: DatabaseConnection,
    pub config: AppConfig,
}

impl TestContext {
    pub async fn new() -> Self {
        // Une seule connexion : chaque connexion SQLite en mémoire a sa propre base
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let media_root: PathBuf =
            std::env::temp_dir().join(format!("foodgram-test-{}", uuid::Uuid::new_v4()));

        Self {
            db,
            config: AppConfig::for_tests(media_root),
        }
    }

    /// Utilisateur inséré directement (pas de hash pbkdf2, ne peut pas se connecter)
    pub async fn user(&self, username: &str) -> users::Model {
        users::ActiveModel {
            email: Set(format!("{}@example.com", username)),
            username: Set(username.to_string()),
            first_name: Set(capitalized(username)),
            last_name: Set("Tester".to_string()),
            password_hash: Set("!".to_string()),
            avatar: Set(None),
            role: Set(users::ROLE_USER.to_string()),
            token_version: Set(0),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    pub async fn admin(&self, username: &str) -> users::Model {
        let user = self.user(username).await;
        let mut active_model: users::ActiveModel = user.into();
        active_model.role = Set(users::ROLE_ADMIN.to_string());
        active_model.update(&self.db).await.unwrap()
    }

    pub fn token(&self, user: &users::Model) -> String {
        jwt::generate_token(
            &self.config.jwt_secret,
            user.id,
            user.token_version,
            self.config.token_ttl_hours,
        )
        .unwrap()
    }

    pub fn auth_header(&self, user: &users::Model) -> (&'static str, String) {
        ("Authorization", format!("Token {}", self.token(user)))
    }

    pub async fn tag(&self, name: &str) -> tag::Model {
        tag::ActiveModel {
            name: Set(name.to_string()),
            slug: Set(name.to_lowercase()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    pub async fn ingredient(&self, name: &str, unit: &str) -> ingredient::Model {
        ingredient::ActiveModel {
            name: Set(name.to_string()),
            measurement_unit: Set(unit.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    pub async fn recipe(
        &self,
        author: &users::Model,
        name: &str,
        tags: &[&tag::Model],
        ingredients: &[(&ingredient::Model, i32)],
    ) -> recipe::Model {
        let request = RecipeWriteRequest {
            ingredients: ingredients
                .iter()
                .map(|(ingredient, amount)| IngredientAmountRequest {
                    id: ingredient.id,
                    amount: *amount,
                })
                .collect(),
            tags: tags.iter().map(|tag| tag.id).collect(),
            image: Some(PIXEL_PNG.to_string()),
            name: name.to_string(),
            text: format!("How to cook {}", name),
            cooking_time: 15,
        };

        RecipeService::create(&self.db, &self.config, author, request)
            .await
            .unwrap()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.config.media_root);
    }
}

fn capitalized(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
