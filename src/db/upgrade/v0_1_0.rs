//! 0.0.x -> 0.1.0: roles, per-context members, provider and model catalogs.

use rusqlite::params;

use super::{finish_step, rebuild_table, seed};
use crate::db::settings;
use crate::db::sql::SqlSession;
use crate::db::version::AppVersion;
use crate::error::AppError;

pub const VERSION: AppVersion = AppVersion::new(0, 1, 0);

pub fn migrate(s: &SqlSession) -> Result<(), AppError> {
    s.execute(
        "UPDATE settings SET value = ?1 WHERE field = ?2",
        params![seed::global_config_v0_1_0().to_string(), settings::GLOBAL_CONFIG],
    )?;

    // Only the legacy agents shape still uses general.* keys
    if s.table_exists("agents")? && !s.column_exists("agents", "ordr")? {
        s.execute(
            r#"UPDATE agents SET config = json_insert(config, '$."general.name"', name)"#,
            [],
        )?;
    }

    create_roles(s)?;

    if !s.table_exists("tools")? {
        s.execute_batch(
            r#"CREATE TABLE IF NOT EXISTS "functions" (
                "id"	INTEGER,
                "name"	TEXT NOT NULL DEFAULT '' UNIQUE,
                "config"	TEXT NOT NULL DEFAULT '{}',
                PRIMARY KEY("id" AUTOINCREMENT)
            );"#,
        )?;
    }

    if s.column_exists("contexts", "agent_id")? {
        split_context_members(s)?;
    }

    if s.table_exists("apis")? && !s.column_exists("apis", "config")? {
        reseed_providers(s)?;
    }

    if s.column_exists("models", "name")? && s.column_exists("models", "model_name")? {
        reseed_models(s)?;
    }

    if s.table_exists("embeddings")? {
        let pruned = s.execute("DELETE FROM embeddings WHERE id > 1984", [])?;
        if pruned > 0 {
            tracing::info!(pruned, "Pruned embeddings");
        }
    }

    finish_step(s, VERSION)
}

fn create_roles(s: &SqlSession) -> Result<(), AppError> {
    s.execute_batch(
        r#"CREATE TABLE IF NOT EXISTS "roles" (
            "id"	INTEGER,
            "name"	TEXT NOT NULL,
            "config"	TEXT NOT NULL DEFAULT '{}',
            PRIMARY KEY("id" AUTOINCREMENT)
        );"#,
    )?;
    let existing: Option<i64> = s.get_scalar("SELECT COUNT(*) FROM roles", [])?;
    if existing.unwrap_or(0) == 0 {
        for (id, name, config) in seed::roles_v0_1_0() {
            s.execute(
                "INSERT INTO roles (id, name, config) VALUES (?1, ?2, ?3)",
                params![id, name, config.to_string()],
            )?;
        }
        tracing::info!("Seeded roles");
    }
    Ok(())
}

/// Move the single agent of each context into `contexts_members` and point
/// assistant messages at that member.
fn split_context_members(s: &SqlSession) -> Result<(), AppError> {
    s.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS "contexts_members" (
            "id"	INTEGER,
            "context_id"	INTEGER NOT NULL,
            "agent_id"	INTEGER NOT NULL,
            "agent_config"	TEXT NOT NULL DEFAULT '{}',
            "ordr"	INTEGER NOT NULL DEFAULT 0,
            "loc_x"	INTEGER NOT NULL DEFAULT 37,
            "loc_y"	INTEGER NOT NULL DEFAULT 30,
            "del"	INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY("id" AUTOINCREMENT)
        );
        CREATE TABLE IF NOT EXISTS "contexts_members_inputs" (
            "id"	INTEGER,
            "member_id"	INTEGER NOT NULL,
            "input_member_id"	INTEGER,
            "type"	INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY("id" AUTOINCREMENT)
        );
        "#,
    )?;

    let first_agent: Option<i64> = s.get_scalar("SELECT id FROM agents ORDER BY id LIMIT 1", [])?;
    if let Some(first_agent) = first_agent {
        s.execute(
            "UPDATE contexts SET agent_id = ?1 WHERE agent_id = 0",
            params![first_agent],
        )?;
    }

    let members = s.execute(
        "INSERT INTO contexts_members (context_id, agent_id, agent_config, loc_x, loc_y)
         SELECT c.id, c.agent_id, COALESCE(a.config, '{}'), 37, 30
         FROM contexts c
         LEFT JOIN agents a ON c.agent_id = a.id
         WHERE c.agent_id != 0
           AND NOT EXISTS (SELECT 1 FROM contexts_members cm WHERE cm.context_id = c.id)",
        [],
    )?;
    tracing::info!(members, "Created context members");

    if !s.column_exists("contexts_messages", "member_id")? {
        rebuild_table(
            s,
            "contexts_messages",
            r#""id"	INTEGER,
            "unix"	INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER)),
            "context_id"	INTEGER,
            "member_id"	INTEGER,
            "role"	TEXT,
            "msg"	TEXT,
            "embedding_id"	INTEGER,
            "log"	TEXT NOT NULL DEFAULT '',
            "del"	INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY("id" AUTOINCREMENT)"#,
            Some(
                "INSERT INTO contexts_messages_new (id, unix, context_id, member_id, role, msg, embedding_id, log, del)
                 SELECT
                     cms.id,
                     cms.unix,
                     cms.context_id,
                     CASE WHEN cms.role = 'assistant' THEN
                         (SELECT MIN(cm.id) FROM contexts_members cm WHERE cm.context_id = cms.context_id)
                     END,
                     cms.role,
                     cms.msg,
                     cms.embedding_id,
                     '',
                     cms.del
                 FROM contexts_messages cms",
            ),
        )?;
    }

    rebuild_table(
        s,
        "contexts",
        r#""id"	INTEGER,
        "parent_id"	INTEGER,
        "branch_msg_id"	INTEGER DEFAULT NULL,
        "summary"	TEXT NOT NULL DEFAULT '',
        "active"	INTEGER DEFAULT 1,
        PRIMARY KEY("id" AUTOINCREMENT)"#,
        Some(
            "INSERT INTO contexts_new (id, parent_id, branch_msg_id, summary, active)
             SELECT id, parent_id, branch_msg_id, summary, 1 FROM contexts",
        ),
    )
}

fn reseed_providers(s: &SqlSession) -> Result<(), AppError> {
    let openai_key: Option<Option<String>> =
        s.get_scalar("SELECT priv_key FROM apis WHERE name = 'OpenAI'", [])?;
    let openai_key = openai_key.flatten().unwrap_or_default();

    s.execute("DELETE FROM apis", [])?;
    for (id, name) in seed::PROVIDERS_V0_1_0 {
        let priv_key = if *id == 4 { openai_key.as_str() } else { "" };
        s.execute(
            "INSERT INTO apis (id, name, client_key, priv_key) VALUES (?1, ?2, '', ?3)",
            params![id, name, priv_key],
        )?;
    }
    tracing::info!(providers = seed::PROVIDERS_V0_1_0.len(), "Reseeded API providers");
    Ok(())
}

fn reseed_models(s: &SqlSession) -> Result<(), AppError> {
    rebuild_table(
        s,
        "models",
        r#""id"	INTEGER,
        "api_id"	INTEGER NOT NULL DEFAULT 0,
        "model_name"	TEXT NOT NULL DEFAULT '',
        "alias"	TEXT DEFAULT '',
        "type"	TEXT DEFAULT 'chat',
        "model_config"	TEXT DEFAULT '{}',
        PRIMARY KEY("id" AUTOINCREMENT)"#,
        None,
    )?;
    for (id, api_id, alias, model_name) in seed::MODELS_V0_1_0 {
        s.execute(
            "INSERT INTO models (id, api_id, alias, model_name, model_config) VALUES (?1, ?2, ?3, ?4, '{}')",
            params![id, api_id, alias, model_name],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::upgrade::legacy_session;

    #[test]
    fn test_migrates_legacy_shape() {
        let s = legacy_session();
        migrate(&s).unwrap();

        assert!(!s.column_exists("contexts", "agent_id").unwrap());
        assert!(s.column_exists("contexts", "active").unwrap());

        let members: Vec<(i64, i64)> = s
            .get_pairs("SELECT context_id, agent_id FROM contexts_members ORDER BY context_id", [])
            .unwrap();
        assert_eq!(members, vec![(1, 1), (2, 2), (3, 2)]);

        let member_ids: Vec<(i64, Option<i64>)> = s
            .get_pairs("SELECT id, member_id FROM contexts_messages ORDER BY id", [])
            .unwrap();
        assert_eq!(member_ids[0].1, None);
        assert_eq!(member_ids[1].1, Some(1));
        assert_eq!(member_ids[4].1, None);
        assert_eq!(member_ids[5].1, Some(3));

        let key: Option<String> = s
            .get_scalar("SELECT priv_key FROM apis WHERE id = 4", [])
            .unwrap();
        assert_eq!(key.as_deref(), Some("sk-legacy"));

        let agent_name: Option<String> = s
            .get_scalar(r#"SELECT json_extract(config, '$."general.name"') FROM agents WHERE id = 2"#, [])
            .unwrap();
        assert_eq!(agent_name.as_deref(), Some("Coder"));

        assert!(s.column_exists("models", "alias").unwrap());
        assert!(!s.column_exists("models", "name").unwrap());
        let roles: Option<i64> = s.get_scalar("SELECT COUNT(*) FROM roles", []).unwrap();
        assert_eq!(roles, Some(5));
        let embeddings: Option<i64> = s.get_scalar("SELECT COUNT(*) FROM embeddings", []).unwrap();
        assert_eq!(embeddings, Some(1));

        assert_eq!(
            settings::read_app_version(s.conn()).unwrap(),
            Some(VERSION)
        );
    }

    #[test]
    fn test_replay_is_a_no_op() {
        let s = legacy_session();
        migrate(&s).unwrap();
        migrate(&s).unwrap();

        let members: Option<i64> = s
            .get_scalar("SELECT COUNT(*) FROM contexts_members", [])
            .unwrap();
        assert_eq!(members, Some(3));
        let roles: Option<i64> = s.get_scalar("SELECT COUNT(*) FROM roles", []).unwrap();
        assert_eq!(roles, Some(5));
    }
}
