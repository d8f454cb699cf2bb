// Usage : import_data <tags|ingredients> <fichier.json>

use std::path::PathBuf;
use std::process::ExitCode;

use foodgram::{config::AppConfig, db};
use foodgram::services::import_service::{ImportKind, ImportService};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (kind, path) = match args.as_slice() {
        [kind, path] => (kind.clone(), PathBuf::from(path)),
        _ => {
            eprintln!("usage: import_data <tags|ingredients> <file.json>");
            return ExitCode::from(2);
        }
    };

    let kind: ImportKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => {
            tracing::error!(error = %e, "invalid import kind");
            return ExitCode::from(2);
        }
    };

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let db = match db::establish_connection(&config).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to database");
            return ExitCode::FAILURE;
        }
    };

    match ImportService::import_file(&db, kind, &path).await {
        Ok(inserted) => {
            tracing::info!(?kind, inserted, file = %path.display(), "import finished");
            println!("Imported {} new {:?} rows from {}", inserted, kind, path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "import failed");
            ExitCode::FAILURE
        }
    }
}
