// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table créée par le crate `migration`.
//
// Liste des modules:
//   - health : Health check API
//   - users : Utilisateurs (email + mot de passe, rôle user/admin)
//   - subscription : Abonnements entre utilisateurs
//   - tag : Tags de recettes (petit-déjeuner, dîner...)
//   - ingredient : Ingrédients et unité de mesure
//   - recipe : Recettes
//   - recipe_ingredient : Liaison recette <-> ingrédient avec quantité
//   - recipe_tag : Liaison recette <-> tag
//   - favorite : Recettes favorites par utilisateur
//   - shopping_cart : Recettes dans la liste de courses
//   - dto : Data Transfer Objects pour les requêtes/réponses API
//
// Points d'attention:
//   - Tous les accès passent par SeaORM (pas de SQL brut)
//   - Les contraintes d'unicité composites vivent dans les migrations
//
// ============================================================================

pub mod health;
pub mod users;
pub mod subscription;
pub mod tag;
pub mod ingredient;
pub mod recipe;
pub mod recipe_ingredient;
pub mod recipe_tag;
pub mod favorite;
pub mod shopping_cart;
pub mod dto;
