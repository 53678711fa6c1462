//! Versioned upgrade of the user database.
//!
//! The ladder is an ordered list of `(version, step)` pairs. An upgrade run
//! copies the primary file to `<primary>.copy`, replays every step newer than
//! the caller's version against the copy, then moves the primary aside to
//! `<primary>.old` (or `.old.old`, ...) and promotes the copy. Nothing touches
//! the primary until every step has succeeded.

pub mod seed;
pub mod v0_1_0;
pub mod v0_2_0;
pub mod v0_3_0;
pub mod v0_4_0;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::db::sql::{with_suffix, Database, SqlSession};
use crate::db::version::AppVersion;
use crate::error::AppError;

/// Suffix appended (repeatedly) to move the primary file out of the way.
pub const OLD_SUFFIX: &str = ".old";

pub type MigrationFn = fn(&SqlSession) -> Result<(), AppError>;

#[derive(Debug, Clone, Copy)]
pub struct LadderEntry {
    pub version: AppVersion,
    /// `None` marks a version that needs no transformation.
    pub migrate: Option<MigrationFn>,
}

impl LadderEntry {
    pub const fn new(version: AppVersion, migrate: Option<MigrationFn>) -> Self {
        Self { version, migrate }
    }
}

/// Every known schema version, oldest first.
pub fn version_ladder() -> Vec<LadderEntry> {
    vec![
        LadderEntry::new(AppVersion::new(0, 0, 8), None),
        LadderEntry::new(AppVersion::new(0, 1, 0), Some(v0_1_0::migrate)),
        LadderEntry::new(AppVersion::new(0, 2, 0), Some(v0_2_0::migrate)),
        LadderEntry::new(AppVersion::new(0, 3, 0), Some(v0_3_0::migrate)),
        LadderEntry::new(AppVersion::new(0, 4, 0), Some(v0_4_0::migrate)),
    ]
}

pub fn latest_version() -> AppVersion {
    version_ladder()
        .iter()
        .map(|entry| entry.version)
        .max()
        .unwrap_or(crate::db::schema::BASELINE_VERSION)
}

/// Run every step newer than `from`, in ladder order, against `session`.
///
/// The cursor only advances in memory; steps persist their own marker.
/// Returns the version the cursor ended on.
pub fn apply_steps(
    session: &SqlSession,
    ladder: &[LadderEntry],
    from: AppVersion,
) -> Result<AppVersion, AppError> {
    let mut cursor = from;
    for entry in ladder {
        if entry.version <= cursor {
            continue;
        }
        match entry.migrate {
            Some(migrate) => {
                tracing::info!(version = %entry.version, path = %session.path().display(), "Applying migration step");
                migrate(session).map_err(|source| AppError::StepFailed {
                    version: entry.version.to_string(),
                    source: Box::new(source),
                })?;
            }
            None => tracing::debug!(version = %entry.version, "Version marker only, nothing to apply"),
        }
        cursor = entry.version;
    }
    Ok(cursor)
}

/// Upgrade the database at `db_path` from `current` using the built-in ladder.
pub fn upgrade(db_path: &Path, current: AppVersion) -> Result<(), AppError> {
    upgrade_with(&version_ladder(), db_path, current)
}

/// Copy, migrate the copy, then promote it.
///
/// Runs the file dance even when no step is pending. On a step failure the
/// primary is left untouched and the partial copy stays on disk until the
/// next run replaces it.
pub fn upgrade_with(
    ladder: &[LadderEntry],
    db_path: &Path,
    current: AppVersion,
) -> Result<(), AppError> {
    let db = Database::new(db_path);
    let primary = db.db_path();
    if !primary.is_file() {
        return Err(AppError::BackupFailed {
            path: primary.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "primary database file not found"),
        });
    }

    let copy = db.copy_path();
    if copy.exists() {
        tracing::warn!(path = %copy.display(), "Discarding stale upgrade copy");
        fs::remove_file(&copy).map_err(|source| AppError::BackupFailed {
            path: copy.clone(),
            source,
        })?;
    }
    fs::copy(primary, &copy).map_err(|source| AppError::BackupFailed {
        path: copy.clone(),
        source,
    })?;

    let session = db.write_to_copy()?;
    let reached = apply_steps(&session, ladder, current)?;
    session.close()?;

    let old = next_old_path(primary);
    fs::rename(primary, &old).map_err(|source| AppError::PromotionFailed {
        from: primary.to_path_buf(),
        to: old.clone(),
        source,
    })?;
    fs::rename(&copy, primary).map_err(|source| AppError::PromotionFailed {
        from: copy.clone(),
        to: primary.to_path_buf(),
        source,
    })?;

    tracing::info!(from = %current, to = %reached, backup = %old.display(), "Database upgraded");
    Ok(())
}

/// First `<primary>.old[.old...]` name that does not exist yet.
pub(crate) fn next_old_path(primary: &Path) -> PathBuf {
    let mut candidate = with_suffix(primary, OLD_SUFFIX);
    while candidate.exists() {
        candidate = with_suffix(&candidate, OLD_SUFFIX);
    }
    candidate
}

/// Rebuild `table` into a new shape: create `<table>_new` from `columns`,
/// run `copy_sql` (an `INSERT INTO <table>_new ... SELECT ... FROM <table>`,
/// or `None` to start empty), drop the old table and rename the new one.
pub(crate) fn rebuild_table(
    session: &SqlSession,
    table: &str,
    columns: &str,
    copy_sql: Option<&str>,
) -> Result<(), AppError> {
    session.execute_batch(&format!(
        "DROP TABLE IF EXISTS \"{table}_new\";
         CREATE TABLE \"{table}_new\" ({columns});"
    ))?;
    if let Some(copy_sql) = copy_sql {
        session.execute_batch(copy_sql)?;
    }
    session.execute_batch(&format!(
        "DROP TABLE \"{table}\";
         ALTER TABLE \"{table}_new\" RENAME TO \"{table}\";"
    ))?;
    tracing::info!(table, "Rebuilt table");
    Ok(())
}

/// Persist the step's version marker and compact the file.
pub(crate) fn finish_step(session: &SqlSession, version: AppVersion) -> Result<(), AppError> {
    crate::db::settings::set_app_version(session.conn(), version)?;
    session.vacuum()?;
    tracing::info!(%version, "Migration step complete");
    Ok(())
}

/// A 0.0.8 database with a little of everything the ladder has to carry over.
#[cfg(test)]
pub(crate) fn legacy_session() -> SqlSession {
    let s = SqlSession::in_memory().unwrap();
    crate::db::schema::create_baseline(s.conn()).unwrap();
    s.execute_batch(
        r#"
        UPDATE apis SET priv_key = 'sk-legacy' WHERE name = 'OpenAI';
        INSERT INTO agents (id, name, "desc", config) VALUES
            (2, 'Coder', '', '{"context.model": "gpt-4", "general.use_plugin": "openinterpreter"}'),
            (3, 'coder', '', '{}');
        INSERT INTO contexts (id, parent_id, branch_msg_id, summary, agent_id) VALUES
            (1, NULL, NULL, 'first', 0),
            (2, NULL, NULL, 'second', 2),
            (3, 1, 2, 'branch of first', 2);
        INSERT INTO contexts_messages (id, context_id, role, msg) VALUES
            (1, 1, 'user', 'hello'),
            (2, 1, 'assistant', 'hi there'),
            (3, 1, 'user', 'again'),
            (4, 1, 'assistant', 'sure'),
            (5, 2, 'user', 'write code'),
            (6, 3, 'assistant', 'branched reply'),
            (7, 3, 'user', 'follow up');
        INSERT INTO models (id, api_id, name, model_name) VALUES (1, 4, 'old', 'gpt-3');
        INSERT INTO blocks (id, name, text) VALUES (1, 'Greeting', 'Hello {name}'), (2, 'greeting', 'Hi');
        INSERT INTO embeddings (id, original_text) VALUES (5, 'keep'), (2000, 'drop');
        INSERT INTO logs (log_type, message) VALUES ('info', 'started');
        "#,
    )
    .unwrap();
    s
}

/// Run the built-in ladder from 0.0.8 up to and including `until`.
#[cfg(test)]
pub(crate) fn migrate_until(s: &SqlSession, until: AppVersion) {
    for entry in version_ladder() {
        if entry.version > until {
            break;
        }
        if let Some(migrate) = entry.migrate {
            migrate(s).unwrap();
        }
    }
}

/// Make `name` unique case-insensitively before a UNIQUE constraint lands.
///
/// In every group of clashing names the lowest id keeps its name; the others
/// get `-<random hex>` appended. Returns the number of renamed rows.
pub(crate) fn dedupe_names(session: &SqlSession, table: &str) -> Result<usize, AppError> {
    let clashes: Vec<(i64, String)> = session.get_pairs(
        &format!(
            "SELECT id, name FROM \"{table}\"
             WHERE LOWER(name) IN (
                 SELECT LOWER(name) FROM \"{table}\" GROUP BY LOWER(name) HAVING COUNT(*) > 1
             )
             AND id NOT IN (SELECT MIN(id) FROM \"{table}\" GROUP BY LOWER(name))
             ORDER BY id"
        ),
        [],
    )?;

    for (id, name) in &clashes {
        let renamed = format!("{}-{}", name, uuid::Uuid::new_v4().simple());
        session.execute(
            &format!("UPDATE \"{table}\" SET name = ?1 WHERE id = ?2"),
            rusqlite::params![renamed, id],
        )?;
    }
    if !clashes.is_empty() {
        tracing::info!(table, renamed = clashes.len(), "Renamed duplicate names");
    }
    Ok(clashes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::{create_baseline, BASELINE_VERSION};
    use crate::db::settings;
    use tempfile::TempDir;

    fn v(s: &str) -> AppVersion {
        s.parse().unwrap()
    }

    /// A primary file holding a `trace` table the recording steps append to.
    fn primary_with_trace(dir: &TempDir, version: &str) -> PathBuf {
        let path = dir.path().join("data.db");
        let s = SqlSession::open(&path).unwrap();
        s.execute_batch(
            "CREATE TABLE settings (field TEXT PRIMARY KEY, value TEXT);
             CREATE TABLE trace (id INTEGER PRIMARY KEY AUTOINCREMENT, version TEXT);",
        )
        .unwrap();
        settings::set(s.conn(), settings::APP_VERSION, version).unwrap();
        s.close().unwrap();
        path
    }

    fn record(session: &SqlSession, version: &str) -> Result<(), AppError> {
        session.execute("INSERT INTO trace (version) VALUES (?1)", [version])?;
        settings::set_app_version(session.conn(), version.parse()?)
    }

    fn step_0_1_0(s: &SqlSession) -> Result<(), AppError> {
        record(s, "0.1.0")
    }
    fn step_0_2_0(s: &SqlSession) -> Result<(), AppError> {
        record(s, "0.2.0")
    }
    fn step_0_3_0(s: &SqlSession) -> Result<(), AppError> {
        record(s, "0.3.0")
    }
    fn step_0_4_0(s: &SqlSession) -> Result<(), AppError> {
        record(s, "0.4.0")
    }
    fn failing_step(s: &SqlSession) -> Result<(), AppError> {
        record(s, "0.3.0")?;
        Err(AppError::Validation("bad row".into()))
    }

    fn recording_ladder() -> Vec<LadderEntry> {
        vec![
            LadderEntry::new(v("0.0.8"), None),
            LadderEntry::new(v("0.1.0"), Some(step_0_1_0)),
            LadderEntry::new(v("0.2.0"), Some(step_0_2_0)),
            LadderEntry::new(v("0.3.0"), Some(step_0_3_0)),
            LadderEntry::new(v("0.4.0"), Some(step_0_4_0)),
        ]
    }

    fn trace(path: &Path) -> Vec<String> {
        let s = SqlSession::open(path).unwrap();
        s.get_results("SELECT version FROM trace ORDER BY id", [], |r| r.get(0))
            .unwrap()
    }

    fn marker(path: &Path) -> Option<AppVersion> {
        let s = SqlSession::open(path).unwrap();
        settings::read_app_version(s.conn()).unwrap()
    }

    #[test]
    fn test_builtin_ladder_strictly_increasing() {
        let ladder = version_ladder();
        assert!(ladder.windows(2).all(|w| w[0].version < w[1].version));
        assert_eq!(ladder[0].version, BASELINE_VERSION);
        assert!(ladder[0].migrate.is_none());
        assert_eq!(latest_version(), v("0.4.0"));
    }

    #[test]
    fn test_runs_only_newer_steps_in_order() {
        let dir = TempDir::new().unwrap();
        let path = primary_with_trace(&dir, "0.1.0");

        upgrade_with(&recording_ladder(), &path, v("0.1.0")).unwrap();

        assert_eq!(trace(&path), vec!["0.2.0", "0.3.0", "0.4.0"]);
        assert_eq!(marker(&path), Some(v("0.4.0")));
        assert!(!Database::new(&path).copy_path().exists());
        assert!(with_suffix(&path, ".old").is_file());
    }

    #[test]
    fn test_at_latest_only_moves_files() {
        let dir = TempDir::new().unwrap();
        let path = primary_with_trace(&dir, "0.4.0");

        upgrade_with(&recording_ladder(), &path, v("0.4.0")).unwrap();

        assert!(trace(&path).is_empty());
        assert_eq!(marker(&path), Some(v("0.4.0")));
        assert!(with_suffix(&path, ".old").is_file());
    }

    #[test]
    fn test_stale_copy_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = primary_with_trace(&dir, "0.3.0");
        let copy = Database::new(&path).copy_path();
        fs::write(&copy, b"half-written garbage from a crashed run").unwrap();

        upgrade_with(&recording_ladder(), &path, v("0.3.0")).unwrap();

        assert_eq!(trace(&path), vec!["0.4.0"]);
        assert!(!copy.exists());
    }

    #[test]
    fn test_existing_backups_never_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = primary_with_trace(&dir, "0.4.0");
        let old = with_suffix(&path, ".old");
        fs::write(&old, b"first backup").unwrap();

        upgrade_with(&recording_ladder(), &path, v("0.4.0")).unwrap();

        assert_eq!(fs::read(&old).unwrap(), b"first backup");
        assert!(with_suffix(&old, ".old").is_file());
        assert_eq!(next_old_path(&path), with_suffix(&old, ".old.old"));
    }

    #[test]
    fn test_failed_step_leaves_primary_untouched() {
        let dir = TempDir::new().unwrap();
        let path = primary_with_trace(&dir, "0.1.0");
        let before = fs::read(&path).unwrap();

        let mut ladder = recording_ladder();
        ladder[3].migrate = Some(failing_step);
        let err = upgrade_with(&ladder, &path, v("0.1.0")).unwrap_err();

        match err {
            AppError::StepFailed { version, source } => {
                assert_eq!(version, "0.3.0");
                assert!(matches!(*source, AppError::Validation(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fs::read(&path).unwrap(), before);
        assert!(!with_suffix(&path, ".old").exists());
        // the partial copy is left for the next run to discard
        assert_eq!(trace(&Database::new(&path).copy_path()), vec!["0.2.0", "0.3.0"]);
    }

    #[test]
    fn test_missing_primary_is_backup_failure() {
        let dir = TempDir::new().unwrap();
        let err = upgrade_with(&recording_ladder(), &dir.path().join("nope.db"), v("0.1.0"))
            .unwrap_err();
        assert!(matches!(err, AppError::BackupFailed { .. }));
    }

    #[test]
    fn test_full_ladder_from_baseline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.db");
        {
            let s = SqlSession::open(&path).unwrap();
            create_baseline(s.conn()).unwrap();
            s.close().unwrap();
        }

        upgrade(&path, BASELINE_VERSION).unwrap();
        assert_eq!(marker(&path), Some(latest_version()));

        // A second run from the same start replays every guarded step on the
        // already-migrated shape.
        upgrade(&path, BASELINE_VERSION).unwrap();
        assert_eq!(marker(&path), Some(latest_version()));
        assert!(with_suffix(&path, ".old.old").is_file());
    }

    #[test]
    fn test_dedupe_keeps_lowest_id_and_unique_rows() {
        let s = SqlSession::in_memory().unwrap();
        s.execute_batch(
            "CREATE TABLE blocks (id INTEGER PRIMARY KEY, name TEXT);
             INSERT INTO blocks (id, name) VALUES (1, 'Intro'), (2, 'intro'), (3, 'INTRO'), (4, 'Other');",
        )
        .unwrap();

        assert_eq!(dedupe_names(&s, "blocks").unwrap(), 2);
        let names: Vec<(i64, String)> = s
            .get_pairs("SELECT id, name FROM blocks ORDER BY id", [])
            .unwrap();
        assert_eq!(names[0].1, "Intro");
        assert!(names[1].1.starts_with("intro-"));
        assert!(names[2].1.starts_with("INTRO-"));
        assert_eq!(names[3].1, "Other");

        // already unique: nothing renamed
        assert_eq!(dedupe_names(&s, "blocks").unwrap(), 0);
    }
}
