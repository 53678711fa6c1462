//! Process configuration resolved once at startup.
//!
//! Values come from the environment (optionally seeded from a `.env` file)
//! and fall back to per-user platform directories.

use std::path::{Path, PathBuf};

/// Overrides the application data directory.
pub const ENV_DATA_DIR: &str = "AGENTPILOT_DATA_DIR";

/// Overrides the database file name inside the data directory.
pub const ENV_DB_FILE: &str = "AGENTPILOT_DB_FILE";

/// Overrides the directory the rolling log file is written to.
pub const ENV_LOG_DIR: &str = "AGENTPILOT_LOG_DIR";

const APP_DIR_NAME: &str = "AgentPilot";
const DEFAULT_DB_FILE: &str = "data.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_file: String,
    pub log_dir: PathBuf,
    /// `.env` file the environment was seeded from, if one was found.
    pub env_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load `.env` (if any) and resolve the configuration from the process environment.
    pub fn load() -> Self {
        let env_file = dotenvy::dotenv().ok();
        Self {
            env_file,
            ..Self::from_lookup(|key| std::env::var(key).ok())
        }
    }

    /// Resolve from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = non_empty(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let db_file = non_empty(ENV_DB_FILE)
            .filter(|name| is_plain_file_name(name))
            .unwrap_or_else(|| DEFAULT_DB_FILE.to_string());

        let log_dir = non_empty(ENV_LOG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("logs"));

        Self {
            data_dir,
            db_file,
            log_dir,
            env_file: None,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// A bare file name; path separators would move the database out of the data dir.
fn is_plain_file_name(name: &str) -> bool {
    Path::new(name).file_name().map(|f| f == name).unwrap_or(false)
}
