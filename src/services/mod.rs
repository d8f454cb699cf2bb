pub mod admin_service;
pub mod catalog_service;
pub mod import_service;
pub mod recipe_service;
pub mod shopping_list_service;
pub mod user_service;
