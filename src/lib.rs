pub mod config;
pub mod db;
pub mod error;
pub mod logging;

use config::AppConfig;
use db::DbPool;
use error::AppError;

/// Process-wide handles produced by startup.
pub struct AppState {
    pub config: AppConfig,
    pub db: DbPool,
}

/// Resolve configuration, start logging and bring the database up to date.
///
/// The returned guard (if any) flushes the log file on drop; hold it for as
/// long as the process logs.
pub fn run() -> Result<(AppState, Option<tracing_appender::non_blocking::WorkerGuard>), AppError> {
    let config = AppConfig::load();
    let guard = logging::init(&config);

    tracing::info!("Starting AgentPilot v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &config.env_file {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    logging::install_crash_hook(&config.data_dir);

    let db = db::init_db(&config)?;
    tracing::info!(max_size = db.max_size(), "Database pool ready");

    Ok((AppState { config, db }, guard))
}
