//pour les requêtes validées et les réponses structurées
use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::tag;

pub const INVALID_USERNAMES: [&str; 1] = ["me"];

/// Équivalent de ^[\w.@+-]+\z, "me" est réservé par /api/users/me/
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if INVALID_USERNAMES.contains(&username) {
        let mut error = ValidationError::new("reserved_username");
        error.message = Some(format!("Username \"{}\" is not allowed", username).into());
        return Err(error);
    }

    let valid_chars = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'));

    if !valid_chars {
        let mut error = ValidationError::new("invalid_username");
        error.message = Some(format!("Username \"{}\" contains invalid characters", username).into());
        return Err(error);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Utilisateurs / auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 150), custom(function = "validate_username"))]
    pub username: String,
    #[validate(length(min = 1, max = 150))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150))]
    pub last_name: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetPasswordRequest {
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
    pub current_password: String,
}

#[derive(Debug, Deserialize)]
pub struct AvatarRequest {
    pub avatar: Option<String>, // data:image/png;base64,...
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserCreatedResponse {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

/// Auteur suivi + ses recettes (limitées par recipes_limit)
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeShortResponse>,
    pub recipes_count: u64,
}

// ---------------------------------------------------------------------------
// Recettes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct IngredientAmountRequest {
    pub id: i32,
    #[validate(range(min = 1, message = "Minimum ingredient amount is 1"))]
    pub amount: i32,
}

/// Corps de POST /recipes/ et PATCH /recipes/{id}/
#[derive(Debug, Deserialize, Validate)]
pub struct RecipeWriteRequest {
    #[validate(nested)]
    pub ingredients: Vec<IngredientAmountRequest>,
    pub tags: Vec<i32>,
    pub image: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(range(min = 1, message = "Minimum cooking time is 1 minute"))]
    pub cooking_time: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeShortResponse {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct RecipeIngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub author: UserResponse,
    pub name: String,
    pub text: String,
    pub tags: Vec<tag::Model>,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub image: Option<String>,
    pub cooking_time: i32,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

#[derive(Debug, Serialize)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

/// Une ligne agrégée de la liste de courses (SUM(amount) GROUP BY ingrédient)
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct TagRequest {
    #[validate(length(min = 1, max = 32))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    pub slug: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct IngredientRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub measurement_unit: String,
}

#[derive(Debug, Serialize)]
pub struct AdminUserRow {
    pub id: i32,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub recipes_count: u64,
    pub subscribers_count: u64,
}

#[derive(Debug, Serialize)]
pub struct AdminRecipeRow {
    pub id: i32,
    pub name: String,
    pub author: String,
    pub favorites_count: u64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("chef.anna+1@site-x_y").is_ok());
        assert!(validate_username("шеф").is_ok());
        assert!(validate_username("me").is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("semi;colon").is_err());
    }

    #[test]
    fn test_recipe_request_validation() {
        let request = RecipeWriteRequest {
            ingredients: vec![IngredientAmountRequest { id: 1, amount: 0 }],
            tags: vec![1],
            image: None,
            name: "Soup".to_string(),
            text: "Boil".to_string(),
            cooking_time: 0,
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.errors();
        assert!(fields.contains_key("cooking_time"));
        assert!(fields.contains_key("ingredients"));
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        let request = RegisterRequest {
            email: "anna@example.com".to_string(),
            username: "anna".to_string(),
            first_name: "Anna".to_string(),
            last_name: "K".to_string(),
            password: "short".to_string(),
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
