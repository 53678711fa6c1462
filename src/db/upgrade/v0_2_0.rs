//! 0.1.0 -> 0.2.0: provider configs, info/chat/group agent keys, folders, tools.

use rusqlite::params;

use super::{dedupe_names, finish_step, rebuild_table, seed};
use crate::db::settings;
use crate::db::sql::SqlSession;
use crate::db::version::AppVersion;
use crate::error::AppError;

pub const VERSION: AppVersion = AppVersion::new(0, 2, 0);

/// Plugin ids renamed in 0.2.0.
const PLUGIN_RENAMES: &[(&str, &str)] = &[
    ("openinterpreter", "Open_Interpreter"),
    ("openaiassistant", "OpenAI_Assistant"),
];

pub fn migrate(s: &SqlSession) -> Result<(), AppError> {
    if s.table_exists("apis")? && !s.column_exists("apis", "config")? {
        rebuild_apis(s)?;
    }

    if s.column_exists("models", "model_name")? {
        rebuild_models(s)?;
    }

    if s.table_exists("agents")? {
        if !s.column_exists("agents", "ordr")? {
            dedupe_names(s, "agents")?;
            rebuild_table(
                s,
                "agents",
                r#""id"	INTEGER,
                "name"	TEXT NOT NULL DEFAULT '' UNIQUE,
                "desc"	TEXT NOT NULL DEFAULT '',
                "config"	TEXT NOT NULL DEFAULT '{}',
                "folder_id"	INTEGER DEFAULT NULL,
                "ordr"	INTEGER DEFAULT 0,
                PRIMARY KEY("id" AUTOINCREMENT)"#,
                Some(&format!(
                    "INSERT INTO agents_new (id, name, `desc`, config, folder_id)
                     SELECT id, name, `desc`, {}, NULL FROM agents",
                    agent_config_from_legacy("config")
                )),
            )?;
        }
        rename_plugins(s, "agents", "config")?;
    }

    if s.column_exists("blocks", "text")? {
        rebuild_table(
            s,
            "blocks",
            r#""id"	INTEGER,
            "name"	TEXT NOT NULL,
            "config"	TEXT NOT NULL DEFAULT '{}',
            "folder_id"	INTEGER DEFAULT NULL,
            "ordr"	INTEGER DEFAULT 0,
            PRIMARY KEY("id" AUTOINCREMENT)"#,
            Some(
                "INSERT INTO blocks_new (id, name, config, folder_id)
                 SELECT id, name, json_object('data', `text`), NULL FROM blocks",
            ),
        )?;
    }

    s.execute_batch(
        r#"CREATE TABLE IF NOT EXISTS "folders" (
            "id"	INTEGER,
            "name"	TEXT NOT NULL,
            "parent_id"	INTEGER,
            "type"	TEXT,
            "config"	TEXT NOT NULL DEFAULT '{}',
            "ordr"	INTEGER DEFAULT 0,
            PRIMARY KEY("id")
        );"#,
    )?;

    if !s.column_exists("roles", "schema")? {
        reseed_roles(s)?;
    }

    migrate_settings(s)?;

    s.execute_batch(
        r#"CREATE TABLE IF NOT EXISTS "tools" (
            "id"	INTEGER,
            "uuid"	TEXT NOT NULL UNIQUE,
            "name"	TEXT NOT NULL DEFAULT '' UNIQUE,
            "config"	TEXT NOT NULL DEFAULT '{}',
            "folder_id"	INTEGER DEFAULT NULL,
            PRIMARY KEY("id" AUTOINCREMENT)
        );
        DROP TABLE IF EXISTS functions;"#,
    )?;

    if s.table_exists("contexts")? && !s.column_exists("contexts", "folder_id")? {
        rebuild_table(
            s,
            "contexts",
            r#""id"	INTEGER,
            "parent_id"	INTEGER,
            "branch_msg_id"	INTEGER DEFAULT NULL,
            "summary"	TEXT NOT NULL DEFAULT '',
            "active"	INTEGER NOT NULL DEFAULT 1,
            "folder_id"	INTEGER DEFAULT NULL,
            "ordr"	INTEGER DEFAULT 0,
            PRIMARY KEY("id" AUTOINCREMENT)"#,
            Some(
                "INSERT INTO contexts_new (id, parent_id, branch_msg_id, summary, active)
                 SELECT id, parent_id, branch_msg_id, summary, COALESCE(active, 1) FROM contexts",
            ),
        )?;
    }

    if s.table_exists("contexts_members")? {
        // json_type is NULL only when the key is absent, so configs already
        // carrying info.name (even as null) are left alone.
        let remapped = s.execute(
            &format!(
                r#"UPDATE contexts_members SET agent_config = {}
                   WHERE json_type(agent_config, '$."info.name"') IS NULL"#,
                agent_config_from_legacy("agent_config")
            ),
            [],
        )?;
        tracing::info!(remapped, "Remapped member agent configs");
        rename_plugins(s, "contexts_members", "agent_config")?;
    }

    finish_step(s, VERSION)
}

/// SQL expression building a 0.2.0 agent document from a legacy one in `column`.
fn agent_config_from_legacy(column: &str) -> String {
    format!(
        r#"json_object(
            'info.avatar_path', json_extract({c}, '$."general.avatar_path"'),
            'info.name', json_extract({c}, '$."general.name"'),
            'info.use_plugin', json_extract({c}, '$."general.use_plugin"'),
            'chat.model', json_extract({c}, '$."context.model"'),
            'chat.display_markdown', json('true'),
            'chat.sys_msg', json_extract({c}, '$."context.sys_msg"'),
            'chat.max_messages', json_extract({c}, '$."context.max_messages"'),
            'chat.max_turns', json_extract({c}, '$."context.max_turns"'),
            'chat.user_msg', json_extract({c}, '$."context.user_msg"'),
            'group.hide_responses', json_extract({c}, '$."group.hide_responses"'),
            'group.output_placeholder', json_extract({c}, '$."group.output_context_placeholder"'),
            'group.show_members_as_user_role', json('true'),
            'group.on_multiple_inputs', 'Merged user message',
            'group.member_description', '',
            'voice.current_id', json_extract({c}, '$."voice.current_id"')
        )"#,
        c = column
    )
}

fn rename_plugins(s: &SqlSession, table: &str, column: &str) -> Result<(), AppError> {
    for (old, new) in PLUGIN_RENAMES {
        s.execute(
            &format!(
                r#"UPDATE {table} SET {column} = json_replace({column}, '$."info.use_plugin"', ?1)
                   WHERE json_extract({column}, '$."info.use_plugin"') = ?2"#
            ),
            params![new, old],
        )?;
    }
    Ok(())
}

fn rebuild_apis(s: &SqlSession) -> Result<(), AppError> {
    // Keys the user typed in themselves; `$VAR` placeholders come from the catalog.
    let user_keys: Vec<(String, String, String)> = s.get_results(
        "SELECT name, client_key, priv_key FROM apis
         WHERE (priv_key != '' OR client_key != '') AND priv_key NOT LIKE '$%'",
        [],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            ))
        },
    )?;

    rebuild_table(
        s,
        "apis",
        r#""id"	INTEGER,
        "name"	TEXT NOT NULL,
        "client_key"	TEXT NOT NULL DEFAULT '',
        "priv_key"	TEXT NOT NULL DEFAULT '',
        "config"	TEXT NOT NULL DEFAULT '{}',
        PRIMARY KEY("id" AUTOINCREMENT)"#,
        None,
    )?;
    for api in seed::API_PROVIDERS {
        s.execute(
            "INSERT INTO apis (id, name, client_key, priv_key, config) VALUES (?1, ?2, '', ?3, ?4)",
            params![api.id, api.name, api.priv_key, api.config()],
        )?;
    }
    for (name, client_key, priv_key) in &user_keys {
        s.execute(
            "UPDATE apis SET client_key = ?1, priv_key = ?2 WHERE name = ?3",
            params![client_key, priv_key, name],
        )?;
    }
    tracing::info!(restored_keys = user_keys.len(), "Rebuilt API providers");
    Ok(())
}

fn rebuild_models(s: &SqlSession) -> Result<(), AppError> {
    rebuild_table(
        s,
        "models",
        r#""id"	INTEGER,
        "api_id"	INTEGER NOT NULL DEFAULT 0,
        "name"	TEXT NOT NULL DEFAULT '',
        "kind"	TEXT NOT NULL DEFAULT 'CHAT',
        "config"	TEXT NOT NULL DEFAULT '{}',
        PRIMARY KEY("id" AUTOINCREMENT)"#,
        None,
    )?;
    for (id, api_id, name, model_name) in seed::MODELS {
        s.execute(
            "INSERT INTO models (id, api_id, name, config) VALUES (?1, ?2, ?3, ?4)",
            params![id, api_id, name, seed::model_config(model_name)],
        )?;
    }
    Ok(())
}

fn reseed_roles(s: &SqlSession) -> Result<(), AppError> {
    s.execute_batch(
        r#"DROP TABLE IF EXISTS roles;
        CREATE TABLE "roles" (
            "id"	INTEGER,
            "name"	TEXT NOT NULL,
            "config"	TEXT NOT NULL DEFAULT '{}',
            "schema"	TEXT NOT NULL DEFAULT '[]',
            PRIMARY KEY("id" AUTOINCREMENT)
        );"#,
    )?;
    for (name, config) in seed::roles() {
        s.execute(
            "INSERT INTO roles (name, config) VALUES (?1, ?2)",
            params![name, config.to_string()],
        )?;
    }
    tracing::info!("Reseeded roles");
    Ok(())
}

fn migrate_settings(s: &SqlSession) -> Result<(), AppError> {
    let conn = s.conn();
    settings::insert_if_absent(conn, settings::APP_CONFIG, &seed::app_config().to_string())?;

    if settings::get(conn, settings::DEFAULT_AGENT)?.is_none() {
        let default_agent = seed::default_agent().to_string();
        let renamed = conn.execute(
            "UPDATE settings SET field = ?1, value = ?2 WHERE field = ?3",
            params![settings::DEFAULT_AGENT, default_agent, settings::GLOBAL_CONFIG],
        )?;
        if renamed == 0 {
            settings::set(conn, settings::DEFAULT_AGENT, &default_agent)?;
        }
    }
    Ok(())
}
