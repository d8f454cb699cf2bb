pub mod image;
pub mod jwt;
pub mod like;
pub mod pagination;
pub mod password;
pub mod shopping_list;
pub mod urls;
