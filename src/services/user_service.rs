use sea_orm::*;
use sea_orm::sea_query::Query;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::dto::{
    RecipeShortResponse, RegisterRequest, SetPasswordRequest, SubscriptionResponse, UserResponse,
};
use crate::models::{recipe, subscription, users};
use crate::services::recipe_service::RecipeService;
use crate::utils::image::{self, AVATARS_DIR};
use crate::utils::pagination::Pagination;
use crate::utils::urls::MediaLinks;
use crate::utils::{jwt, password};

pub const RECIPES_LIMIT_PARAM: &str = "recipes_limit";
pub const DEFAULT_RECIPES_LIMIT: u64 = 999;

pub struct UserService;

impl UserService {
    pub async fn get(db: &DatabaseConnection, user_id: i32) -> Result<users::Model, ApiError> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    /// Représentation publique d'un utilisateur vue par `viewer`
    pub async fn to_response(
        db: &DatabaseConnection,
        user: &users::Model,
        viewer: Option<i32>,
        links: &MediaLinks,
    ) -> Result<UserResponse, DbErr> {
        let is_subscribed = match viewer {
            Some(viewer_id) => Self::is_subscribed(db, viewer_id, user.id).await?,
            None => false,
        };

        Ok(UserResponse {
            email: user.email.clone(),
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
            avatar: links.url(user.avatar.as_deref()),
        })
    }

    pub async fn is_subscribed(
        db: &DatabaseConnection,
        user_id: i32,
        author_id: i32,
    ) -> Result<bool, DbErr> {
        let count = subscription::Entity::find()
            .filter(subscription::Column::UserId.eq(user_id))
            .filter(subscription::Column::AuthorId.eq(author_id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    /// Liste paginée, triée par username
    pub async fn list(
        db: &DatabaseConnection,
        pagination: &Pagination,
    ) -> Result<(u64, Vec<users::Model>), ApiError> {
        let query = users::Entity::find();
        let count = query.clone().count(db).await?;
        pagination.ensure_exists(count)?;

        let users = query
            .order_by_asc(users::Column::Username)
            .offset(pagination.offset())
            .limit(pagination.limit)
            .all(db)
            .await?;

        Ok((count, users))
    }

    /// Inscription : email et username uniques, mot de passe hashé
    pub async fn register(
        db: &DatabaseConnection,
        request: RegisterRequest,
    ) -> Result<users::Model, ApiError> {
        let email_taken = users::Entity::find()
            .filter(users::Column::Email.eq(&request.email))
            .count(db)
            .await?
            > 0;
        if email_taken {
            return Err(ApiError::validation("A user with that email already exists"));
        }

        let username_taken = users::Entity::find()
            .filter(users::Column::Username.eq(&request.username))
            .count(db)
            .await?
            > 0;
        if username_taken {
            return Err(ApiError::validation("A user with that username already exists"));
        }

        let password_hash = password::hash_password(&request.password).map_err(ApiError::Internal)?;

        let new_user = users::ActiveModel {
            email: Set(request.email),
            username: Set(request.username),
            first_name: Set(request.first_name),
            last_name: Set(request.last_name),
            password_hash: Set(password_hash),
            avatar: Set(None),
            role: Set(users::ROLE_USER.to_string()),
            token_version: Set(0),
            ..Default::default()
        };

        let user = new_user
            .insert(db)
            .await
            .map_err(|e| ApiError::from_insert(e, "A user with that email or username already exists"))?;

        tracing::info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Connexion par email + mot de passe, retourne le token
    pub async fn login(
        db: &DatabaseConnection,
        config: &AppConfig,
        email: &str,
        plain_password: &str,
    ) -> Result<String, ApiError> {
        let invalid = || ApiError::validation("Unable to log in with provided credentials");

        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await?
            .ok_or_else(invalid)?;

        let is_valid =
            password::verify_password(plain_password, &user.password_hash).map_err(ApiError::Internal)?;
        if !is_valid {
            return Err(invalid());
        }

        jwt::generate_token(
            &config.jwt_secret,
            user.id,
            user.token_version,
            config.token_ttl_hours,
        )
        .map_err(ApiError::Internal)
    }

    /// Révoque tous les tokens émis jusqu'ici
    pub async fn logout(db: &DatabaseConnection, user: users::Model) -> Result<(), ApiError> {
        let next_version = user.token_version + 1;
        let mut active_model: users::ActiveModel = user.into();
        active_model.token_version = Set(next_version);
        active_model.update(db).await?;
        Ok(())
    }

    pub async fn set_password(
        db: &DatabaseConnection,
        user: users::Model,
        request: SetPasswordRequest,
    ) -> Result<(), ApiError> {
        let is_valid = password::verify_password(&request.current_password, &user.password_hash)
            .map_err(ApiError::Internal)?;
        if !is_valid {
            return Err(ApiError::validation("Current password is incorrect"));
        }

        let new_password_hash = password::hash_password(&request.new_password).map_err(ApiError::Internal)?;

        let mut active_model: users::ActiveModel = user.into();
        active_model.password_hash = Set(new_password_hash);
        active_model.update(db).await?;
        Ok(())
    }

    /// Remplace l'avatar (l'ancien fichier est supprimé après la mise à jour)
    pub async fn set_avatar(
        db: &DatabaseConnection,
        config: &AppConfig,
        user: users::Model,
        data_url: Option<&str>,
    ) -> Result<users::Model, ApiError> {
        let data_url = data_url
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ApiError::validation("Avatar is required"))?;

        let new_path = image::save_data_url(&config.media_root, AVATARS_DIR, data_url).await?;
        let old_path = user.avatar.clone();

        let mut active_model: users::ActiveModel = user.into();
        active_model.avatar = Set(Some(new_path));
        let updated = active_model.update(db).await?;

        if let Some(old) = old_path {
            image::remove_media(&config.media_root, &old).await;
        }

        Ok(updated)
    }

    pub async fn delete_avatar(
        db: &DatabaseConnection,
        config: &AppConfig,
        user: users::Model,
    ) -> Result<(), ApiError> {
        let old_path = user
            .avatar
            .clone()
            .ok_or_else(|| ApiError::validation("User has no avatar"))?;

        let mut active_model: users::ActiveModel = user.into();
        active_model.avatar = Set(None);
        active_model.update(db).await?;

        image::remove_media(&config.media_root, &old_path).await;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Abonnements
    // -----------------------------------------------------------------------

    /// Auteurs suivis par `user_id`, paginés et triés par username
    pub async fn list_subscriptions(
        db: &DatabaseConnection,
        user_id: i32,
        pagination: &Pagination,
    ) -> Result<(u64, Vec<users::Model>), ApiError> {
        let query = users::Entity::find().filter(
            users::Column::Id.in_subquery(
                Query::select()
                    .column(subscription::Column::AuthorId)
                    .from(subscription::Entity)
                    .and_where(subscription::Column::UserId.eq(user_id))
                    .to_owned(),
            ),
        );

        let count = query.clone().count(db).await?;
        pagination.ensure_exists(count)?;

        let authors = query
            .order_by_asc(users::Column::Username)
            .offset(pagination.offset())
            .limit(pagination.limit)
            .all(db)
            .await?;

        Ok((count, authors))
    }

    /// Auteur + ses recettes les plus récentes (au plus `recipes_limit`)
    pub async fn subscription_response(
        db: &DatabaseConnection,
        author: &users::Model,
        viewer: Option<i32>,
        recipes_limit: u64,
        links: &MediaLinks,
    ) -> Result<SubscriptionResponse, DbErr> {
        let user = Self::to_response(db, author, viewer, links).await?;

        let authored = recipe::Entity::find().filter(recipe::Column::AuthorId.eq(author.id));
        let recipes_count = authored.clone().count(db).await?;

        let recipes: Vec<RecipeShortResponse> = authored
            .order_by_desc(recipe::Column::CreatedAt)
            .order_by_desc(recipe::Column::Id)
            .limit(recipes_limit)
            .all(db)
            .await?
            .iter()
            .map(|r| RecipeService::to_short(r, links))
            .collect();

        Ok(SubscriptionResponse {
            user,
            recipes,
            recipes_count,
        })
    }

    pub async fn subscribe(
        db: &DatabaseConnection,
        user_id: i32,
        author_id: i32,
    ) -> Result<users::Model, ApiError> {
        let author = Self::get(db, author_id).await?;

        if author.id == user_id {
            return Err(ApiError::validation("You cannot subscribe to yourself"));
        }

        let already = format!("You are already subscribed to \"{}\"", author.username);
        if Self::is_subscribed(db, user_id, author.id).await? {
            return Err(ApiError::validation(already.clone()));
        }

        subscription::ActiveModel {
            user_id: Set(user_id),
            author_id: Set(author.id),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| ApiError::from_insert(e, &already))?;

        tracing::info!(user_id, author_id = author.id, "subscription created");
        Ok(author)
    }

    pub async fn unsubscribe(
        db: &DatabaseConnection,
        user_id: i32,
        author_id: i32,
    ) -> Result<(), ApiError> {
        let author = Self::get(db, author_id).await?;

        let result = subscription::Entity::delete_many()
            .filter(subscription::Column::UserId.eq(user_id))
            .filter(subscription::Column::AuthorId.eq(author.id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ApiError::validation("Subscription does not exist"));
        }

        Ok(())
    }
}

/// recipes_limit de la query string ; absent ou invalide -> pas de limite pratique
pub fn recipes_limit(pairs: &[(String, String)]) -> u64 {
    crate::utils::urls::query_value(pairs, RECIPES_LIMIT_PARAM)
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(DEFAULT_RECIPES_LIMIT)
}
