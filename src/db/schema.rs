//! The oldest schema the upgrade ladder knows how to start from (0.0.8).
//!
//! A fresh install creates this shape and then replays every migration step,
//! so new and upgraded databases end up identical.

use rusqlite::{params, Connection};

use crate::db::settings;
use crate::db::version::AppVersion;
use crate::error::AppError;

pub const BASELINE_VERSION: AppVersion = AppVersion::new(0, 0, 8);

/// Create the 0.0.8 tables and their starting rows. Existing tables are kept.
pub fn create_baseline(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS "settings" (
            "field"	TEXT,
            "value"	TEXT,
            PRIMARY KEY("field")
        );

        CREATE TABLE IF NOT EXISTS "agents" (
            "id"	INTEGER,
            "name"	TEXT NOT NULL DEFAULT '',
            "desc"	TEXT NOT NULL DEFAULT '',
            "config"	TEXT NOT NULL DEFAULT '{}',
            PRIMARY KEY("id" AUTOINCREMENT)
        );

        CREATE TABLE IF NOT EXISTS "contexts" (
            "id"	INTEGER,
            "parent_id"	INTEGER,
            "branch_msg_id"	INTEGER DEFAULT NULL,
            "summary"	TEXT NOT NULL DEFAULT '',
            "agent_id"	INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY("id" AUTOINCREMENT)
        );

        CREATE TABLE IF NOT EXISTS "contexts_messages" (
            "id"	INTEGER,
            "unix"	INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER)),
            "context_id"	INTEGER,
            "role"	TEXT,
            "msg"	TEXT,
            "embedding_id"	INTEGER,
            "del"	INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY("id" AUTOINCREMENT)
        );

        CREATE TABLE IF NOT EXISTS "apis" (
            "id"	INTEGER,
            "name"	TEXT NOT NULL,
            "client_key"	TEXT NOT NULL DEFAULT '',
            "priv_key"	TEXT NOT NULL DEFAULT '',
            PRIMARY KEY("id" AUTOINCREMENT)
        );

        CREATE TABLE IF NOT EXISTS "models" (
            "id"	INTEGER,
            "api_id"	INTEGER NOT NULL DEFAULT 0,
            "name"	TEXT NOT NULL DEFAULT '',
            "model_name"	TEXT NOT NULL DEFAULT '',
            PRIMARY KEY("id" AUTOINCREMENT)
        );

        CREATE TABLE IF NOT EXISTS "blocks" (
            "id"	INTEGER,
            "name"	TEXT NOT NULL,
            "text"	TEXT NOT NULL DEFAULT '',
            PRIMARY KEY("id" AUTOINCREMENT)
        );

        CREATE TABLE IF NOT EXISTS "embeddings" (
            "id"	INTEGER,
            "original_text"	TEXT NOT NULL,
            "embedding"	TEXT,
            PRIMARY KEY("id" AUTOINCREMENT)
        );

        CREATE TABLE IF NOT EXISTS "logs" (
            "id"	INTEGER,
            "log_type"	TEXT,
            "message"	TEXT,
            PRIMARY KEY("id" AUTOINCREMENT)
        );
        "#,
    )?;

    settings::insert_if_absent(conn, settings::APP_VERSION, &BASELINE_VERSION.to_string())?;
    settings::insert_if_absent(conn, settings::GLOBAL_CONFIG, "{}")?;

    conn.execute(
        "INSERT OR IGNORE INTO agents (id, name, `desc`, config) VALUES (1, ?1, '', '{}')",
        params!["Assistant"],
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO apis (id, name, client_key, priv_key) VALUES (4, 'OpenAI', '', '')",
        [],
    )?;

    tracing::debug!(version = %BASELINE_VERSION, "Baseline schema created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_is_repeatable() {
        let conn = Connection::open_in_memory().unwrap();
        create_baseline(&conn).unwrap();
        create_baseline(&conn).unwrap();

        assert_eq!(
            settings::read_app_version(&conn).unwrap(),
            Some(BASELINE_VERSION)
        );
        let agents: i64 = conn
            .query_row("SELECT COUNT(*) FROM agents", [], |r| r.get(0))
            .unwrap();
        assert_eq!(agents, 1);
    }
}
