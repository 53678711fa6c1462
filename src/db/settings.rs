use rusqlite::{params, Connection, OptionalExtension};

use crate::db::version::AppVersion;
use crate::error::AppError;

pub const APP_VERSION: &str = "app_version";
pub const APP_CONFIG: &str = "app_config";
pub const DEFAULT_AGENT: &str = "default_agent";
/// Pre-0.2.0 name of `default_agent`.
pub const GLOBAL_CONFIG: &str = "global_config";
pub const ACCEPTED_TOS: &str = "accepted_tos";
pub const MY_UUID: &str = "my_uuid";

/// Get a setting value by field. Returns None if not found.
pub fn get(conn: &Connection, field: &str) -> Result<Option<String>, AppError> {
    let value = conn
        .query_row(
            "SELECT value FROM settings WHERE field = ?1",
            params![field],
            |row| row.get::<_, Option<String>>(0),
        )
        .optional()?;
    Ok(value.flatten())
}

/// Set a setting value, inserting the row when missing.
///
/// Legacy databases carry no unique constraint on `field`, so this is an
/// update-then-insert rather than an upsert.
pub fn set(conn: &Connection, field: &str, value: &str) -> Result<(), AppError> {
    let updated = conn.execute(
        "UPDATE settings SET value = ?2 WHERE field = ?1",
        params![field, value],
    )?;
    if updated == 0 {
        conn.execute(
            "INSERT INTO settings (field, value) VALUES (?1, ?2)",
            params![field, value],
        )?;
    }
    Ok(())
}

/// Insert a setting only when no row for `field` exists. Returns true if inserted.
pub fn insert_if_absent(conn: &Connection, field: &str, value: &str) -> Result<bool, AppError> {
    let inserted = conn.execute(
        "INSERT INTO settings (field, value)
         SELECT ?1, ?2
         WHERE NOT EXISTS (SELECT 1 FROM settings WHERE field = ?1)",
        params![field, value],
    )?;
    Ok(inserted > 0)
}

/// Delete a setting by field. Returns true if a row was deleted.
pub fn delete(conn: &Connection, field: &str) -> Result<bool, AppError> {
    let rows = conn.execute("DELETE FROM settings WHERE field = ?1", params![field])?;
    Ok(rows > 0)
}

/// Persisted schema version; `None` when the settings table or the marker row is missing.
pub fn read_app_version(conn: &Connection) -> Result<Option<AppVersion>, AppError> {
    let has_settings: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'settings'",
        [],
        |row| row.get(0),
    )?;
    if has_settings == 0 {
        return Ok(None);
    }
    get(conn, APP_VERSION)?
        .map(|raw| raw.parse::<AppVersion>())
        .transpose()
}

/// Write the schema version marker. A stored version that is already higher
/// is left alone, so the marker never moves backwards.
pub fn set_app_version(conn: &Connection, version: AppVersion) -> Result<(), AppError> {
    let stored = get(conn, APP_VERSION)?.and_then(|raw| raw.parse::<AppVersion>().ok());
    if let Some(stored) = stored {
        if stored >= version {
            tracing::debug!(%stored, requested = %version, "Version marker already current");
            return Ok(());
        }
    }
    set(conn, APP_VERSION, &version.to_string())?;
    tracing::debug!(%version, "Version marker written");
    Ok(())
}
