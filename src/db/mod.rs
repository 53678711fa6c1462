pub mod config_doc;
pub mod schema;
pub mod settings;
pub mod sql;
pub mod upgrade;
pub mod version;

use std::path::Path;

use r2d2::{CustomizeConnection, Pool};
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::AppConfig;
use crate::error::AppError;
use sql::SqlSession;
use version::AppVersion;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Connection customizer that sets per-connection SQLite pragmas.
#[derive(Debug)]
struct SqlitePragmaCustomizer;

impl CustomizeConnection<rusqlite::Connection, rusqlite::Error> for SqlitePragmaCustomizer {
    fn on_acquire(&self, conn: &mut rusqlite::Connection) -> Result<(), rusqlite::Error> {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -8000;",
        )?;
        Ok(())
    }
}

/// Initialize the database: create or upgrade the file, then open the pool.
///
/// A missing file is created at the 0.0.8 baseline and taken through every
/// step in place. An existing file goes through the copy-and-promote upgrade
/// when its stored version is behind the newest ladder entry.
pub fn init_db(config: &AppConfig) -> Result<DbPool, AppError> {
    std::fs::create_dir_all(&config.data_dir)?;
    let db_path = config.db_path();

    tracing::info!(path = %db_path.display(), "Initializing database");

    if db_path.is_file() {
        upgrade_existing(&db_path)?;
    } else {
        create_fresh(&db_path)?;
    }

    let manager = SqliteConnectionManager::file(&db_path);
    let pool = Pool::builder()
        .max_size(8)
        .connection_customizer(Box::new(SqlitePragmaCustomizer))
        .build(manager)?;

    // Set WAL journal mode (database-wide, only needs to run once)
    {
        let conn = pool.get()?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        tracing::debug!("SQLite pragmas configured (WAL, FK, busy_timeout)");
    }

    tracing::info!("Database initialized successfully");
    Ok(pool)
}

/// A half-built new file is removed so the next start creates it again.
fn create_fresh(db_path: &Path) -> Result<(), AppError> {
    let build = || -> Result<AppVersion, AppError> {
        let session = SqlSession::open(db_path)?;
        schema::create_baseline(session.conn())?;
        let reached =
            upgrade::apply_steps(&session, &upgrade::version_ladder(), schema::BASELINE_VERSION)?;
        session.close()?;
        Ok(reached)
    };

    match build() {
        Ok(reached) => {
            tracing::info!(version = %reached, "Created new database");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Creating the database failed");
            if let Err(rm) = std::fs::remove_file(db_path) {
                tracing::warn!(error = %rm, "Could not remove partial database file");
            }
            Err(e)
        }
    }
}

fn upgrade_existing(db_path: &Path) -> Result<(), AppError> {
    let current = stored_version(db_path)?;
    let latest = upgrade::latest_version();
    if current < latest {
        tracing::info!(from = %current, to = %latest, "Database is behind, upgrading");
        upgrade::upgrade(db_path, current)?;
    } else {
        tracing::debug!(version = %current, "Database schema is current");
    }
    Ok(())
}

/// Version marker of the file at `db_path`; an unmarked file counts as the baseline.
///
/// Closing the last connection also checkpoints a WAL left behind by an
/// unclean exit, so the upgrade copy sees every committed row.
fn stored_version(db_path: &Path) -> Result<AppVersion, AppError> {
    let session = SqlSession::open(db_path)?;
    let version = settings::read_app_version(session.conn())?;
    session.close()?;
    Ok(version.unwrap_or(schema::BASELINE_VERSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sql::with_suffix;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> AppConfig {
        AppConfig::from_lookup(|key| {
            (key == crate::config::ENV_DATA_DIR).then(|| dir.path().join("data").display().to_string())
        })
    }

    #[test]
    fn test_fresh_install_reaches_latest_without_backup() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        let pool = init_db(&config).unwrap();
        let conn = pool.get().unwrap();
        assert_eq!(
            settings::read_app_version(&conn).unwrap(),
            Some(upgrade::latest_version())
        );
        let entities: i64 = conn
            .query_row("SELECT COUNT(*) FROM entities", [], |r| r.get(0))
            .unwrap();
        assert_eq!(entities, 1);
        assert!(!with_suffix(&config.db_path(), ".old").exists());
    }

    #[test]
    fn test_legacy_file_is_upgraded_with_backup() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        std::fs::create_dir_all(&config.data_dir).unwrap();
        {
            let s = SqlSession::open(config.db_path()).unwrap();
            schema::create_baseline(s.conn()).unwrap();
            s.close().unwrap();
        }

        let pool = init_db(&config).unwrap();
        let conn = pool.get().unwrap();
        assert_eq!(
            settings::read_app_version(&conn).unwrap(),
            Some(upgrade::latest_version())
        );
        drop(conn);
        drop(pool);

        let old = with_suffix(&config.db_path(), ".old");
        let backup = SqlSession::open(&old).unwrap();
        assert_eq!(
            settings::read_app_version(backup.conn()).unwrap(),
            Some(schema::BASELINE_VERSION)
        );

        // Already current: nothing moves on the next start
        init_db(&config).unwrap();
        assert!(!with_suffix(&old, ".old").exists());
    }
}
