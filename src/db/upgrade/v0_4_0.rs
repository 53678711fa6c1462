//! 0.3.0 -> 0.4.0: system blocks, workflow tools, uuid tool references.

use std::collections::HashMap;

use rusqlite::params;
use serde_json::{json, Value};

use super::{dedupe_names, finish_step, rebuild_table, seed};
use crate::db::config_doc::{rewrite_row_config, ToolIdMap};
use crate::db::settings;
use crate::db::sql::SqlSession;
use crate::db::version::AppVersion;
use crate::error::AppError;

pub const VERSION: AppVersion = AppVersion::new(0, 4, 0);

const SYSTEM_BLOCKS_FOLDER: &str = "System blocks";
const SYSTEM_SUBFOLDERS: &[&str] = &["Enhance prompt", "Enhance system msg"];

pub fn migrate(s: &SqlSession) -> Result<(), AppError> {
    if s.table_exists("models")? && s.table_exists("apis")? {
        let orphans = s.execute(
            "DELETE FROM models WHERE api_id NOT IN (SELECT id FROM apis)",
            [],
        )?;
        if orphans > 0 {
            tracing::info!(orphans, "Deleted models without a provider");
        }
    }
    if s.column_exists("apis", "provider_plugin")? {
        s.execute(
            "UPDATE apis SET provider_plugin = 'litellm' WHERE provider_plugin = '' OR provider_plugin IS NULL",
            [],
        )?;
    }

    migrate_folders(s)?;
    create_new_tables(s)?;
    migrate_logs(s)?;

    if s.column_type("contexts_messages", "member_id")?.as_deref() == Some("INTEGER") {
        rebuild_table(
            s,
            "contexts_messages",
            r#""id"	INTEGER,
            "unix"	INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER)),
            "context_id"	INTEGER,
            "member_id"	TEXT NOT NULL,
            "role"	TEXT,
            "msg"	TEXT,
            "embedding_id"	INTEGER,
            "log"	TEXT NOT NULL DEFAULT '',
            "alt_turn"	INTEGER NOT NULL DEFAULT 0,
            "del"	INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY("id" AUTOINCREMENT)"#,
            Some(
                "INSERT INTO contexts_messages_new (id, unix, context_id, member_id, role, msg, embedding_id, log, alt_turn, del)
                 SELECT id, unix, context_id, CAST(member_id AS TEXT), role, msg, embedding_id, log, alt_turn, del
                 FROM contexts_messages",
            ),
        )?;
    }

    if s.column_exists("models", "schema_plugin")? {
        rebuild_table(
            s,
            "models",
            r#""id"	INTEGER,
            "api_id"	INTEGER NOT NULL DEFAULT 0,
            "name"	TEXT NOT NULL DEFAULT '',
            "kind"	TEXT NOT NULL DEFAULT 'CHAT',
            "config"	TEXT NOT NULL DEFAULT '{}',
            "folder_id"	INTEGER DEFAULT NULL,
            PRIMARY KEY("id" AUTOINCREMENT)"#,
            Some(
                "INSERT INTO models_new (id, api_id, name, kind, config, folder_id)
                 SELECT id, api_id, name, kind, config, folder_id FROM models",
            ),
        )?;
    }

    if s.table_exists("contexts")? && !s.column_exists("contexts", "kind")? {
        rebuild_table(
            s,
            "contexts",
            r#""id"	INTEGER,
            "parent_id"	INTEGER,
            "branch_msg_id"	INTEGER DEFAULT NULL,
            "name"	TEXT NOT NULL DEFAULT '',
            "kind"	TEXT NOT NULL DEFAULT 'CHAT',
            "active"	INTEGER NOT NULL DEFAULT 1,
            "folder_id"	INTEGER DEFAULT NULL,
            "ordr"	INTEGER DEFAULT 0,
            "config"	TEXT NOT NULL DEFAULT '{}',
            PRIMARY KEY("id" AUTOINCREMENT)"#,
            Some(
                "INSERT INTO contexts_new (id, parent_id, branch_msg_id, name, kind, active, folder_id, ordr, config)
                 SELECT id, parent_id, branch_msg_id, name, 'CHAT', active, folder_id, ordr, config
                 FROM contexts",
            ),
        )?;
    }

    if s.table_exists("blocks")? && !s.column_exists("blocks", "kind")? {
        dedupe_names(s, "blocks")?;
        rebuild_table(
            s,
            "blocks",
            r#""id"	INTEGER,
            "name"	TEXT NOT NULL UNIQUE,
            "kind"	TEXT NOT NULL DEFAULT 'USER',
            "config"	TEXT NOT NULL DEFAULT '{}',
            "folder_id"	INTEGER DEFAULT NULL,
            "ordr"	INTEGER DEFAULT 0,
            PRIMARY KEY("id" AUTOINCREMENT)"#,
            Some(
                "INSERT INTO blocks_new (id, name, kind, config, folder_id, ordr)
                 SELECT id, name, 'USER', config, folder_id, ordr FROM blocks",
            ),
        )?;
    }

    let has_instructions: Option<i64> = s.get_scalar(
        "SELECT COUNT(*) FROM roles WHERE LOWER(name) = 'instructions'",
        [],
    )?;
    if has_instructions.unwrap_or(0) == 0 {
        s.execute(
            "INSERT INTO roles (name, config) VALUES ('instructions', ?1)",
            params![seed::muted_role().to_string()],
        )?;
    }

    seed_system_blocks(s)?;

    for (table, kind) in [("blocks", "block"), ("entities", "agent")] {
        if s.table_exists(table)? {
            s.execute(
                &format!(
                    "UPDATE \"{table}\" SET config = json_insert(config, '$._TYPE', ?1)
                     WHERE json_extract(config, '$._TYPE') IS NULL"
                ),
                params![kind],
            )?;
        }
    }

    wrap_legacy_tools(s)?;

    s.execute(
        r#"UPDATE settings SET value = json_set(value, '$."system.dev_mode"', json('false'))
           WHERE field = ?1"#,
        params![settings::APP_CONFIG],
    )?;

    rewrite_tool_references(s)?;

    finish_step(s, VERSION)
}

fn migrate_folders(s: &SqlSession) -> Result<(), AppError> {
    const FOLDERS_DDL: &str = r#""id"	INTEGER,
        "name"	TEXT NOT NULL,
        "parent_id"	INTEGER,
        "type"	TEXT,
        "config"	TEXT NOT NULL DEFAULT '{}',
        "expanded"	INTEGER NOT NULL DEFAULT 1,
        "ordr"	INTEGER DEFAULT 0,
        PRIMARY KEY("id")"#;

    if !s.table_exists("folders")? {
        s.execute_batch(&format!("CREATE TABLE \"folders\" ({FOLDERS_DDL});"))?;
    } else if !s.column_exists("folders", "expanded")? {
        rebuild_table(
            s,
            "folders",
            FOLDERS_DDL,
            Some(
                "INSERT INTO folders_new (id, name, parent_id, type, config, expanded, ordr)
                 SELECT id, name, parent_id, type, config, 1, ordr FROM folders",
            ),
        )?;
    }
    Ok(())
}

fn create_new_tables(s: &SqlSession) -> Result<(), AppError> {
    s.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS "workspaces" (
            "id"	INTEGER,
            "name"	TEXT,
            "config"	TEXT DEFAULT '{}',
            "folder_id"	INTEGER DEFAULT NULL,
            PRIMARY KEY("id" AUTOINCREMENT)
        );
        CREATE TABLE IF NOT EXISTS "pypi_packages" (
            "name"	TEXT,
            "folder_id"	INTEGER DEFAULT NULL,
            PRIMARY KEY("name")
        );
        CREATE TABLE IF NOT EXISTS "schedule" (
            "id"	INTEGER,
            "name"	TEXT NOT NULL,
            "folder_id"	INTEGER DEFAULT NULL,
            "unix"	INTEGER NOT NULL,
            "unix_radius"	INTEGER NOT NULL,
            "time_expression"	TEXT NOT NULL,
            "unix_created"	INTEGER NOT NULL,
            PRIMARY KEY("id" AUTOINCREMENT)
        );
        "#,
    )
}

fn migrate_logs(s: &SqlSession) -> Result<(), AppError> {
    const LOGS_DDL: &str = r#""id"	INTEGER,
        "name"	TEXT,
        "config"	TEXT DEFAULT '{}',
        "folder_id"	INTEGER DEFAULT NULL,
        PRIMARY KEY("id" AUTOINCREMENT)"#;

    match s.column_count("logs")? {
        0 => s.execute_batch(&format!("CREATE TABLE \"logs\" ({LOGS_DDL});")),
        3 => rebuild_table(
            s,
            "logs",
            LOGS_DDL,
            Some(
                "INSERT INTO logs_new (id, name, config, folder_id)
                 SELECT id, log_type, message, NULL FROM logs",
            ),
        ),
        _ => Ok(()),
    }
}

/// Create the locked `System blocks` folder tree and its built-in workflow
/// blocks. Skipped entirely once the folder exists.
fn seed_system_blocks(s: &SqlSession) -> Result<(), AppError> {
    let existing: Option<i64> = s.get_scalar(
        "SELECT COUNT(*) FROM folders WHERE name = ?1 AND type = 'blocks'",
        params![SYSTEM_BLOCKS_FOLDER],
    )?;
    if existing.unwrap_or(0) > 0 {
        return Ok(());
    }

    s.execute(
        "INSERT INTO folders (name, type, config, ordr, expanded) VALUES (?1, 'blocks', ?2, 5, 0)",
        params![
            SYSTEM_BLOCKS_FOLDER,
            json!({ "icon_path": ":/resources/icon-settings-solid.png", "locked": true }).to_string()
        ],
    )?;
    let root_id = s.conn().last_insert_rowid();

    let wand = json!({ "icon_path": ":/resources/icon-wand.png", "locked": true }).to_string();
    let mut folder_ids: HashMap<&str, i64> = HashMap::new();
    for name in SYSTEM_SUBFOLDERS {
        s.execute(
            "INSERT INTO folders (name, parent_id, type, config, ordr) VALUES (?1, ?2, 'blocks', ?3, 5)",
            params![name, root_id, wand],
        )?;
        folder_ids.insert(*name, s.conn().last_insert_rowid());
    }

    for block in seed::system_blocks() {
        let folder_id = block.folder.and_then(|f| folder_ids.get(f).copied());
        s.execute(
            "INSERT INTO blocks (name, config, folder_id)
             SELECT ?1, ?2, ?3
             WHERE NOT EXISTS (SELECT 1 FROM blocks WHERE LOWER(name) = LOWER(?1))",
            params![block.name, block.config.to_string(), folder_id],
        )?;
    }
    tracing::info!(folder_id = root_id, "Seeded system blocks");
    Ok(())
}

/// Tools stored before 0.4.0 hold bare code; wrap each in a workflow.
fn wrap_legacy_tools(s: &SqlSession) -> Result<(), AppError> {
    let legacy: Vec<(i64, String)> = s.get_pairs(
        "SELECT id, config FROM tools WHERE json_extract(config, '$._TYPE') IS NULL",
        [],
    )?;
    for (id, config) in &legacy {
        let parsed: Value = serde_json::from_str(config)?;
        s.execute(
            "UPDATE tools SET config = ?1 WHERE id = ?2",
            params![seed::tool_workflow(&parsed).to_string(), id],
        )?;
    }
    if !legacy.is_empty() {
        tracing::info!(tools = legacy.len(), "Wrapped legacy tools into workflows");
    }
    Ok(())
}

fn rewrite_tool_references(s: &SqlSession) -> Result<(), AppError> {
    let id_map: ToolIdMap = s
        .get_pairs::<i64, String, _>("SELECT id, uuid FROM tools", [])?
        .into_iter()
        .collect();

    for table in ["entities", "contexts"] {
        if !s.table_exists(table)? {
            continue;
        }
        let rows: Vec<(i64, String)> =
            s.get_pairs(&format!("SELECT id, config FROM \"{table}\""), [])?;
        let mut changed = 0usize;
        for (id, config) in &rows {
            let rewritten = rewrite_row_config(config, &id_map)?;
            if &rewritten != config {
                s.execute(
                    &format!("UPDATE \"{table}\" SET config = ?1 WHERE id = ?2"),
                    params![rewritten, id],
                )?;
                changed += 1;
            }
        }
        tracing::info!(table, rows = rows.len(), changed, "Rewrote tool references");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::upgrade::{legacy_session, migrate_until, v0_3_0};

    /// A 0.3.0 database with tools, tool references and an orphan model.
    fn session_at_0_3_0() -> SqlSession {
        let s = legacy_session();
        migrate_until(&s, v0_3_0::VERSION);
        s.execute_batch(
            r#"
            INSERT INTO tools (id, uuid, name, config) VALUES
                (1, 'uuid-one', 'Search', '{"code.data": "print(1)", "description": "find"}'),
                (2, 'uuid-two', 'Calc', '{"_TYPE": "workflow", "members": []}');
            UPDATE entities SET config = json_set(config, '$."tools.data"', '[{"id": "1"}, {"id": "9"}]')
                WHERE id = 2;
            UPDATE contexts SET config = json_set(config, '$.members[1].config."tools.data"', '[{"id": "2"}]')
                WHERE id = 2;
            INSERT INTO models (id, api_id, name) VALUES (9999, 999, 'orphan');
            ALTER TABLE models ADD COLUMN schema_plugin TEXT;
            "#,
        )
        .unwrap();
        s
    }

    fn scalar(s: &SqlSession, sql: &str) -> Option<String> {
        s.get_scalar(sql, []).unwrap()
    }

    fn count(s: &SqlSession, sql: &str) -> i64 {
        s.get_scalar(sql, []).unwrap().unwrap_or(0)
    }

    #[test]
    fn test_tool_references_become_uuids() {
        let s = session_at_0_3_0();
        migrate(&s).unwrap();

        assert_eq!(
            scalar(&s, r#"SELECT json_extract(config, '$."tools.data"') FROM entities WHERE id = 2"#).as_deref(),
            Some(r#"["uuid-one"]"#)
        );
        assert_eq!(
            scalar(&s, r#"SELECT json_extract(config, '$.members[1].config."tools.data"') FROM contexts WHERE id = 2"#)
                .as_deref(),
            Some(r#"["uuid-two"]"#)
        );
        assert_eq!(
            scalar(&s, "SELECT json_extract(config, '$._TYPE') FROM entities WHERE id = 2").as_deref(),
            Some("agent")
        );

        assert_eq!(
            scalar(&s, "SELECT json_extract(config, '$.members[0].config.data') FROM tools WHERE id = 1").as_deref(),
            Some("print(1)")
        );
        assert_eq!(
            scalar(&s, "SELECT json_extract(config, '$.description') FROM tools WHERE id = 1").as_deref(),
            Some("find")
        );
        assert_eq!(
            scalar(&s, "SELECT config FROM tools WHERE id = 2").as_deref(),
            Some(r#"{"_TYPE": "workflow", "members": []}"#)
        );
    }

    #[test]
    fn test_schema_changes() {
        let s = session_at_0_3_0();
        migrate(&s).unwrap();

        assert_eq!(count(&s, "SELECT COUNT(*) FROM models WHERE id = 9999"), 0);
        assert!(!s.column_exists("models", "schema_plugin").unwrap());
        assert_eq!(
            scalar(&s, "SELECT provider_plugin FROM apis WHERE id = 4").as_deref(),
            Some("litellm")
        );
        assert_eq!(
            scalar(&s, "SELECT provider_plugin FROM apis WHERE name = 'FakeYou'").as_deref(),
            Some("fakeyou")
        );

        assert!(s.column_exists("folders", "expanded").unwrap());
        for table in ["workspaces", "pypi_packages", "schedule"] {
            assert!(s.table_exists(table).unwrap(), "{table} missing");
        }
        assert_eq!(scalar(&s, "SELECT name FROM logs WHERE id = 1").as_deref(), Some("info"));

        assert_eq!(s.column_type("contexts_messages", "member_id").unwrap().as_deref(), Some("TEXT"));
        assert_eq!(
            scalar(&s, "SELECT typeof(member_id) || ':' || member_id FROM contexts_messages WHERE id = 6").as_deref(),
            Some("text:3")
        );
        assert_eq!(scalar(&s, "SELECT kind FROM contexts WHERE id = 1").as_deref(), Some("CHAT"));
        assert_eq!(count(&s, "SELECT COUNT(*) FROM roles WHERE name = 'instructions'"), 1);
        assert_eq!(
            scalar(&s, r#"SELECT json_type(value, '$."system.dev_mode"') FROM settings WHERE field = 'app_config'"#)
                .as_deref(),
            Some("false")
        );
    }

    #[test]
    fn test_blocks_deduped_and_system_blocks_seeded() {
        let s = session_at_0_3_0();
        migrate(&s).unwrap();

        let names: Vec<(i64, String)> = s
            .get_pairs("SELECT id, name FROM blocks WHERE id IN (1, 2) ORDER BY id", [])
            .unwrap();
        assert_eq!(names[0].1, "Greeting");
        assert!(names[1].1.starts_with("greeting-"));
        assert_eq!(
            scalar(&s, "SELECT json_extract(config, '$._TYPE') FROM blocks WHERE id = 1").as_deref(),
            Some("block")
        );
        assert_eq!(scalar(&s, "SELECT kind FROM blocks WHERE id = 1").as_deref(), Some("USER"));

        let root: i64 = s
            .get_scalar("SELECT id FROM folders WHERE name = 'System blocks'", [])
            .unwrap()
            .unwrap();
        assert_eq!(
            count(&s, "SELECT expanded FROM folders WHERE name = 'System blocks'"),
            0
        );
        let enhance: i64 = s
            .get_scalar("SELECT id FROM folders WHERE name = 'Enhance prompt' AND parent_id = ?1", [root])
            .unwrap()
            .unwrap();
        let enhancer_folder: Option<i64> = s
            .get_scalar("SELECT folder_id FROM blocks WHERE name = 'claude-prompt-enhancer'", [])
            .unwrap();
        assert_eq!(enhancer_folder, Some(enhance));
        assert_eq!(
            scalar(&s, "SELECT json_extract(config, '$._TYPE') FROM blocks WHERE name = 'tree-of-thoughts'").as_deref(),
            Some("workflow")
        );
    }

    #[test]
    fn test_replay_adds_nothing() {
        let s = session_at_0_3_0();
        migrate(&s).unwrap();
        let blocks = count(&s, "SELECT COUNT(*) FROM blocks");
        let folders = count(&s, "SELECT COUNT(*) FROM folders");
        let entity = scalar(&s, "SELECT config FROM entities WHERE id = 2");
        let tool = scalar(&s, "SELECT config FROM tools WHERE id = 1");

        migrate(&s).unwrap();

        assert_eq!(count(&s, "SELECT COUNT(*) FROM blocks"), blocks);
        assert_eq!(count(&s, "SELECT COUNT(*) FROM folders"), folders);
        assert_eq!(scalar(&s, "SELECT config FROM entities WHERE id = 2"), entity);
        assert_eq!(scalar(&s, "SELECT config FROM tools WHERE id = 1"), tool);
        assert_eq!(count(&s, "SELECT COUNT(*) FROM roles WHERE name = 'instructions'"), 1);
        assert_eq!(settings::read_app_version(s.conn()).unwrap(), Some(VERSION));
    }
}
