//! 0.2.0 -> 0.3.0: alternate turns, workflow contexts, entities, themes.

use std::collections::{BTreeMap, HashMap};

use rusqlite::params;
use serde_json::{json, Value};

use super::{finish_step, rebuild_table, seed};
use crate::db::settings;
use crate::db::sql::SqlSession;
use crate::db::version::AppVersion;
use crate::error::AppError;

pub const VERSION: AppVersion = AppVersion::new(0, 3, 0);

/// Tables no longer used by 0.3.0.
const RETIRED_TABLES: &[&str] = &[
    "categories",
    "character_categories",
    "embeddings",
    "example_tasks",
    "examples_time_expressions",
    "lists",
    "lists_items",
    "schedule_items",
    "voices",
];

/// `(id, context_id, role)` of one message.
type MessageRow = (i64, Option<i64>, Option<String>);

pub fn migrate(s: &SqlSession) -> Result<(), AppError> {
    if s.table_exists("contexts_messages")? && !s.column_exists("contexts_messages", "alt_turn")? {
        add_alt_turns(s)?;
    }

    if s.column_exists("contexts", "summary")? {
        contexts_to_workflows(s)?;
    }

    if s.table_exists("agents")? {
        if s.table_exists("entities")? {
            tracing::warn!("Both agents and entities exist, leaving agents in place");
        } else {
            agents_to_entities(s)?;
        }
    }

    s.execute_batch(
        r#"CREATE TABLE IF NOT EXISTS "themes" (
            "name"	TEXT NOT NULL UNIQUE,
            "config"	TEXT NOT NULL DEFAULT '{}',
            PRIMARY KEY("name")
        );"#,
    )?;
    for (name, config) in seed::themes() {
        s.execute(
            "INSERT OR IGNORE INTO themes (name, config) VALUES (?1, ?2)",
            params![name, config.to_string()],
        )?;
    }

    create_resource_tables(s)?;

    if s.column_exists("apis", "priv_key")? {
        rebuild_table(
            s,
            "apis",
            r#""id"	INTEGER,
            "name"	TEXT NOT NULL,
            "client_key"	TEXT NOT NULL DEFAULT '',
            "api_key"	TEXT NOT NULL DEFAULT '',
            "provider_plugin"	TEXT DEFAULT NULL,
            "config"	TEXT NOT NULL DEFAULT '{}',
            PRIMARY KEY("id" AUTOINCREMENT)"#,
            Some(
                "INSERT INTO apis_new (id, name, client_key, api_key, config)
                 SELECT id, name, client_key, priv_key, config FROM apis",
            ),
        )?;
        s.execute(
            "UPDATE apis SET provider_plugin = 'fakeyou' WHERE LOWER(name) = 'fakeyou'",
            [],
        )?;
    }

    if s.table_exists("models")? && !s.column_exists("models", "folder_id")? {
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
                 SELECT id, api_id, name, kind, config, NULL FROM models",
            ),
        )?;
    }

    for table in RETIRED_TABLES {
        s.execute_batch(&format!("DROP TABLE IF EXISTS \"{table}\";"))?;
    }

    let has_output: Option<i64> =
        s.get_scalar("SELECT COUNT(*) FROM roles WHERE name = 'output'", [])?;
    if has_output.unwrap_or(0) == 0 {
        s.execute(
            "INSERT INTO roles (name, config) VALUES ('output', ?1)",
            params![seed::muted_role().to_string()],
        )?;
    }

    let conn = s.conn();
    settings::insert_if_absent(conn, settings::ACCEPTED_TOS, "0")?;
    settings::insert_if_absent(conn, settings::MY_UUID, "")?;

    finish_step(s, VERSION)
}

/// Ids of messages on the alternate turn.
///
/// Messages are walked per context in id order. The first message of a
/// context inherits the turn of the message its context branched from (or
/// starts at 0); every later `user` message flips the turn.
fn alternate_turns(messages: &[MessageRow], branch_msg_ids: &HashMap<i64, i64>) -> Vec<i64> {
    let mut turns: HashMap<i64, u8> = HashMap::new();
    let mut current_context: Option<Option<i64>> = None;
    let mut turn = 0u8;

    for (id, context_id, role) in messages {
        if current_context != Some(*context_id) {
            current_context = Some(*context_id);
            turn = context_id
                .and_then(|c| branch_msg_ids.get(&c))
                .and_then(|msg_id| turns.get(msg_id))
                .copied()
                .unwrap_or(0);
        } else if role.as_deref() == Some("user") {
            turn = 1 - turn;
        }
        turns.insert(*id, turn);
    }

    let mut alternate: Vec<i64> = turns
        .into_iter()
        .filter_map(|(id, turn)| (turn == 1).then_some(id))
        .collect();
    alternate.sort_unstable();
    alternate
}

fn add_alt_turns(s: &SqlSession) -> Result<(), AppError> {
    let messages: Vec<MessageRow> = s.get_results(
        "SELECT id, context_id, role FROM contexts_messages ORDER BY context_id, id",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;
    let branch_msg_ids: HashMap<i64, i64> = s
        .get_pairs::<i64, i64, _>(
            "SELECT id, branch_msg_id FROM contexts WHERE branch_msg_id IS NOT NULL",
            [],
        )?
        .into_iter()
        .collect();
    let alternate = alternate_turns(&messages, &branch_msg_ids);

    rebuild_table(
        s,
        "contexts_messages",
        r#""id"	INTEGER,
        "unix"	INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER)),
        "context_id"	INTEGER,
        "member_id"	INTEGER NOT NULL,
        "role"	TEXT,
        "msg"	TEXT,
        "embedding_id"	INTEGER,
        "log"	TEXT NOT NULL DEFAULT '',
        "alt_turn"	INTEGER NOT NULL DEFAULT 0,
        "del"	INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY("id" AUTOINCREMENT)"#,
        Some(
            "INSERT INTO contexts_messages_new (id, unix, context_id, member_id, role, msg, embedding_id, log, alt_turn, del)
             SELECT id, unix, context_id, COALESCE(member_id, 1), role, msg, embedding_id, log, 0, del
             FROM contexts_messages",
        ),
    )?;

    for id in &alternate {
        s.execute(
            "UPDATE contexts_messages SET alt_turn = 1 WHERE id = ?1",
            params![id],
        )?;
    }
    // Single-user history: every user message belongs to the user member.
    s.execute(
        "UPDATE contexts_messages SET member_id = 1 WHERE role = 'user'",
        [],
    )?;
    tracing::info!(
        messages = messages.len(),
        alternate = alternate.len(),
        "Assigned alternate turns"
    );
    Ok(())
}

/// Fold `contexts_members` and their inputs into a workflow document stored on
/// each context. The user is always member `1` and comes first.
fn contexts_to_workflows(s: &SqlSession) -> Result<(), AppError> {
    let mut members: BTreeMap<i64, Vec<Value>> = BTreeMap::new();
    let mut inputs: BTreeMap<i64, Vec<Value>> = BTreeMap::new();

    if s.table_exists("contexts_members")? {
        let rows = s.get_results(
            "SELECT context_id, id, agent_id, loc_x, loc_y, agent_config, del
             FROM contexts_members ORDER BY context_id, id",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, Option<i64>>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, i64>(6)?,
                ))
            },
        )?;
        for (context_id, id, agent_id, loc_x, loc_y, agent_config, del) in rows {
            let config = match agent_config.as_deref() {
                Some(text) => serde_json::from_str::<Value>(text).inspect_err(|e| {
                    tracing::error!(member_id = id, error = %e, "Unreadable member config");
                })?,
                None => json!({}),
            };
            members.entry(context_id).or_default().push(json!({
                "id": id,
                "agent_id": agent_id,
                "loc_x": loc_x,
                "loc_y": loc_y,
                "config": config,
                "del": del,
            }));
        }
    }

    if s.table_exists("contexts_members_inputs")? && s.table_exists("contexts_members")? {
        let rows = s.get_results(
            "SELECT cm.context_id, cmi.member_id, COALESCE(cmi.input_member_id, 1), cmi.type
             FROM contexts_members_inputs cmi
             JOIN contexts_members cm ON cm.id = cmi.member_id
             ORDER BY cmi.id",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            },
        )?;
        for (context_id, member_id, input_member_id, kind) in rows {
            inputs.entry(context_id).or_default().push(json!({
                "member_id": member_id,
                "input_member_id": input_member_id,
                "type": kind,
            }));
        }
    }

    rebuild_table(
        s,
        "contexts",
        r#""id"	INTEGER,
        "parent_id"	INTEGER,
        "branch_msg_id"	INTEGER DEFAULT NULL,
        "name"	TEXT NOT NULL DEFAULT '',
        "active"	INTEGER NOT NULL DEFAULT 1,
        "folder_id"	INTEGER DEFAULT NULL,
        "ordr"	INTEGER DEFAULT 0,
        "config"	TEXT NOT NULL DEFAULT '{}',
        PRIMARY KEY("id" AUTOINCREMENT)"#,
        Some(
            "INSERT INTO contexts_new (id, parent_id, branch_msg_id, name, active, folder_id, ordr, config)
             SELECT id, parent_id, branch_msg_id, summary, COALESCE(active, 1), folder_id, ordr, '{}'
             FROM contexts",
        ),
    )?;

    let context_ids: Vec<i64> = s.get_results("SELECT id FROM contexts ORDER BY id", [], |r| r.get(0))?;
    for context_id in &context_ids {
        let mut workflow_members = vec![json!({
            "id": 1,
            "agent_id": null,
            "loc_x": -10,
            "loc_y": 64,
            "config": { "_TYPE": "user" },
            "del": 0,
        })];
        workflow_members.extend(members.remove(context_id).unwrap_or_default());
        let config = json!({
            "_TYPE": "workflow",
            "members": workflow_members,
            "inputs": inputs.remove(context_id).unwrap_or_default(),
        });
        s.execute(
            "UPDATE contexts SET config = ?1 WHERE id = ?2",
            params![config.to_string(), context_id],
        )?;
    }

    s.execute_batch(
        "DROP TABLE IF EXISTS contexts_members;
         DROP TABLE IF EXISTS contexts_members_inputs;",
    )?;
    tracing::info!(contexts = context_ids.len(), "Converted contexts to workflows");
    Ok(())
}

fn agents_to_entities(s: &SqlSession) -> Result<(), AppError> {
    s.execute_batch(
        r#"CREATE TABLE "entities" (
            "id"	INTEGER,
            "name"	TEXT NOT NULL DEFAULT '' UNIQUE,
            "desc"	TEXT NOT NULL DEFAULT '',
            "kind"	TEXT NOT NULL DEFAULT 'AGENT',
            "config"	TEXT NOT NULL DEFAULT '{}',
            "folder_id"	INTEGER DEFAULT NULL,
            "ordr"	INTEGER DEFAULT 0,
            PRIMARY KEY("id" AUTOINCREMENT)
        );
        INSERT INTO entities (id, name, "desc", kind, config, folder_id, ordr)
            SELECT id, name, "desc", 'AGENT', config, folder_id, ordr FROM agents;
        DROP TABLE agents;"#,
    )?;

    let updated = s.execute(
        r#"UPDATE entities
           SET config = json_patch(config, json_object('chat.sys_msg', ?1))
           WHERE json_extract(config, '$."info.use_plugin"') = 'Open_Interpreter'"#,
        params![seed::OPEN_INTERPRETER_SYS_MSG],
    )?;
    tracing::info!(interpreter_agents = updated, "Moved agents to entities");
    Ok(())
}

fn create_resource_tables(s: &SqlSession) -> Result<(), AppError> {
    // Pre-0.3.0 files tables had a different shape and no config column.
    for table in ["files", "file_exts"] {
        if s.table_exists(table)? && !s.column_exists(table, "config")? {
            s.execute_batch(&format!("DROP TABLE \"{table}\";"))?;
        }
    }

    s.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS "vectordbs" (
            "id"	INTEGER,
            "name"	TEXT NOT NULL,
            "folder_id"	INTEGER DEFAULT NULL,
            "config"	TEXT NOT NULL DEFAULT '{}',
            PRIMARY KEY("id" AUTOINCREMENT)
        );
        CREATE TABLE IF NOT EXISTS "sandboxes" (
            "id"	INTEGER,
            "name"	TEXT NOT NULL,
            "folder_id"	INTEGER DEFAULT NULL,
            "config"	TEXT NOT NULL DEFAULT '{}',
            PRIMARY KEY("id" AUTOINCREMENT)
        );
        CREATE TABLE IF NOT EXISTS "files" (
            "id"	INTEGER,
            "name"	TEXT NOT NULL,
            "folder_id"	INTEGER DEFAULT NULL,
            "config"	TEXT NOT NULL DEFAULT '{}',
            PRIMARY KEY("id" AUTOINCREMENT)
        );
        CREATE TABLE IF NOT EXISTS "file_exts" (
            "id"	INTEGER,
            "name"	TEXT NOT NULL UNIQUE,
            "folder_id"	INTEGER DEFAULT NULL,
            "config"	TEXT NOT NULL DEFAULT '{}',
            PRIMARY KEY("id" AUTOINCREMENT)
        );
        "#,
    )?;
    s.execute(
        "INSERT OR IGNORE INTO sandboxes (id, name, config) VALUES (1, 'Local', ?1)",
        params![json!({ "sandbox_type": "" }).to_string()],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::upgrade::{legacy_session, migrate_until, v0_2_0};

    fn session_at_0_2_0() -> SqlSession {
        let s = legacy_session();
        migrate_until(&s, v0_2_0::VERSION);
        s
    }

    fn scalar(s: &SqlSession, sql: &str) -> Option<String> {
        s.get_scalar(sql, []).unwrap()
    }

    fn count(s: &SqlSession, sql: &str) -> i64 {
        s.get_scalar(sql, []).unwrap().unwrap_or(0)
    }

    #[test]
    fn test_alternate_turns_follow_branches() {
        let user = || Some("user".to_string());
        let assistant = || Some("assistant".to_string());
        let messages = vec![
            (1, Some(1), user()),
            (2, Some(1), assistant()),
            (3, Some(1), user()),
            (4, Some(1), assistant()),
            (5, Some(2), user()),
            (6, Some(2), user()),
            (7, Some(3), assistant()),
            (8, Some(3), user()),
        ];
        // context 3 branched from message 3, which is on the alternate turn
        let branches = HashMap::from([(3, 3)]);

        assert_eq!(alternate_turns(&messages, &branches), vec![3, 4, 6, 7]);
        assert!(alternate_turns(&[], &branches).is_empty());
    }

    #[test]
    fn test_messages_and_contexts() {
        let s = session_at_0_2_0();
        migrate(&s).unwrap();

        let rows: Vec<(i64, i64)> = s
            .get_pairs("SELECT member_id, alt_turn FROM contexts_messages ORDER BY id", [])
            .unwrap();
        let member_ids: Vec<i64> = rows.iter().map(|r| r.0).collect();
        let turns: Vec<i64> = rows.iter().map(|r| r.1).collect();
        assert_eq!(member_ids, vec![1, 1, 1, 1, 1, 3, 1]);
        assert_eq!(turns, vec![0, 0, 1, 1, 0, 0, 1]);

        assert!(!s.table_exists("contexts_members").unwrap());
        assert!(!s.table_exists("contexts_members_inputs").unwrap());
        assert_eq!(
            scalar(&s, "SELECT name FROM contexts WHERE id = 3").as_deref(),
            Some("branch of first")
        );
        assert_eq!(
            scalar(&s, "SELECT json_extract(config, '$._TYPE') FROM contexts WHERE id = 2").as_deref(),
            Some("workflow")
        );
        assert_eq!(
            scalar(&s, "SELECT json_extract(config, '$.members[0].config._TYPE') FROM contexts WHERE id = 2").as_deref(),
            Some("user")
        );
        let agent: Option<i64> = s
            .get_scalar("SELECT json_extract(config, '$.members[1].agent_id') FROM contexts WHERE id = 2", [])
            .unwrap();
        assert_eq!(agent, Some(2));
        assert_eq!(
            count(&s, "SELECT json_array_length(config, '$.inputs') FROM contexts WHERE id = 2"),
            0
        );
    }

    #[test]
    fn test_contexts_without_members_get_user_only_workflow() {
        let s = session_at_0_2_0();
        s.execute_batch("DROP TABLE contexts_members; DROP TABLE contexts_members_inputs;")
            .unwrap();
        migrate(&s).unwrap();

        assert_eq!(
            count(&s, "SELECT json_array_length(config, '$.members') FROM contexts WHERE id = 1"),
            1
        );
    }

    #[test]
    fn test_malformed_member_config_aborts() {
        let s = session_at_0_2_0();
        s.execute_batch("UPDATE contexts_members SET agent_config = '{broken' WHERE id = (SELECT MIN(id) FROM contexts_members);")
            .unwrap();

        assert!(matches!(migrate(&s), Err(AppError::Serde(_))));
        assert!(s.column_exists("contexts", "summary").unwrap());
        assert_eq!(
            count(&s, "SELECT COUNT(*) FROM contexts_members WHERE agent_config = '{broken'"),
            1
        );
    }

    #[test]
    fn test_existing_entities_leave_agents_untouched() {
        let s = session_at_0_2_0();
        s.execute_batch(
            r#"CREATE TABLE entities (
                   "id" INTEGER PRIMARY KEY, "name" TEXT NOT NULL UNIQUE, "desc" TEXT NOT NULL DEFAULT '',
                   "kind" TEXT NOT NULL DEFAULT 'AGENT', "config" TEXT NOT NULL DEFAULT '{}',
                   "folder_id" INTEGER DEFAULT NULL, "ordr" INTEGER DEFAULT 0
               );
               INSERT INTO entities (id, name) VALUES (2, 'Preexisting');"#,
        )
        .unwrap();

        migrate(&s).unwrap();

        assert!(s.table_exists("agents").unwrap());
        assert_eq!(count(&s, "SELECT COUNT(*) FROM agents"), 3);
        assert_eq!(count(&s, "SELECT COUNT(*) FROM entities"), 1);
        assert_eq!(scalar(&s, "SELECT name FROM entities WHERE id = 2").as_deref(), Some("Preexisting"));
    }

    #[test]
    fn test_entities_and_reference_tables() {
        let s = session_at_0_2_0();
        migrate(&s).unwrap();

        assert!(!s.table_exists("agents").unwrap());
        assert_eq!(count(&s, "SELECT COUNT(*) FROM entities WHERE kind = 'AGENT'"), 3);
        let sys_msg = scalar(
            &s,
            r#"SELECT json_extract(config, '$."chat.sys_msg"') FROM entities WHERE id = 2"#,
        )
        .unwrap();
        assert_eq!(sys_msg, seed::OPEN_INTERPRETER_SYS_MSG);

        assert_eq!(count(&s, "SELECT COUNT(*) FROM themes"), 3);
        assert_eq!(count(&s, "SELECT COUNT(*) FROM sandboxes"), 1);
        assert!(s.table_exists("vectordbs").unwrap());
        assert!(s.column_exists("files", "config").unwrap());
        assert!(!s.table_exists("embeddings").unwrap());

        assert_eq!(scalar(&s, "SELECT api_key FROM apis WHERE id = 4").as_deref(), Some("sk-legacy"));
        assert_eq!(
            scalar(&s, "SELECT provider_plugin FROM apis WHERE name = 'FakeYou'").as_deref(),
            Some("fakeyou")
        );
        assert!(s.column_exists("models", "folder_id").unwrap());
        assert_eq!(count(&s, "SELECT COUNT(*) FROM roles WHERE name = 'output'"), 1);
        assert_eq!(
            settings::get(s.conn(), settings::ACCEPTED_TOS).unwrap().as_deref(),
            Some("0")
        );
        assert_eq!(settings::get(s.conn(), settings::MY_UUID).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_replay_keeps_user_edits() {
        let s = session_at_0_2_0();
        migrate(&s).unwrap();
        s.execute_batch(
            r#"UPDATE entities SET config = json_set(config, '$."chat.sys_msg"', 'custom') WHERE id = 2;
               UPDATE settings SET value = '1' WHERE field = 'accepted_tos';"#,
        )
        .unwrap();

        migrate(&s).unwrap();

        assert_eq!(
            scalar(&s, r#"SELECT json_extract(config, '$."chat.sys_msg"') FROM entities WHERE id = 2"#).as_deref(),
            Some("custom")
        );
        assert_eq!(
            settings::get(s.conn(), settings::ACCEPTED_TOS).unwrap().as_deref(),
            Some("1")
        );
        assert_eq!(count(&s, "SELECT COUNT(*) FROM roles WHERE name = 'output'"), 1);
        assert_eq!(count(&s, "SELECT COUNT(*) FROM themes"), 3);
        assert_eq!(count(&s, "SELECT SUM(alt_turn) FROM contexts_messages"), 3);
    }
}
