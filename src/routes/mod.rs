pub mod admin;
pub mod auth;
pub mod health;
pub mod ingredients;
pub mod media;
pub mod recipes;
pub mod short_link;
pub mod tags;
pub mod users;

use actix_web::{error, web, HttpRequest};

use crate::config::AppConfig;
use crate::error::ApiError;

/// Corps JSON illisible ou mal typé -> 400 {"error": ...} comme le reste de l'API
fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::validation(err.to_string()).into()
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, config: &AppConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/api")
                .service(health::health_check)
                .configure(auth::auth_routes)
                .configure(users::users_routes)
                .configure(tags::tags_routes)
                .configure(ingredients::ingredients_routes)
                .configure(recipes::recipes_routes)
                .configure(admin::admin_routes)
        )
        .service(short_link::redirect_short_link);

    media::media_routes(cfg, &config.media_url);
}
