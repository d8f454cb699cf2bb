use actix_web::{middleware::{Logger, NormalizePath}, web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use foodgram::{config::AppConfig, db, routes};

/// LOG_FORMAT=json pour la prod, sortie lisible sinon ; niveau via RUST_LOG (info par défaut)
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.pretty().init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    tracing::info!("Connecting to database...");
    let db = db::establish_connection(&config)
        .await
        .map_err(std::io::Error::other)?;
    tracing::info!("Database connected, migrations applied");

    let bind_address = (config.host.clone(), config.port);
    tracing::info!("Starting server on http://{}:{}", bind_address.0, bind_address.1);

    let db_data = web::Data::new(db);
    let config_data = web::Data::new(config);

    HttpServer::new(move || {
        let config = config_data.clone();
        App::new()
            .wrap(NormalizePath::trim())
            .wrap(Logger::default())
            .app_data(db_data.clone())
            .app_data(config.clone())
            .configure(|cfg| routes::configure_routes(cfg, &config))
    })
        .bind(bind_address)?
        .run()
        .await
}
