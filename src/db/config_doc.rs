//! Configuration documents stored as JSON text in `entities.config`,
//! `contexts.config`, `blocks.config`, `tools.config` and friends.
//!
//! Documents are discriminated by their `_TYPE` field. A `workflow` nests
//! further documents under `members[*].config`, so rewriting is recursive.
//! Documents without `_TYPE` predate the discriminator and are agents.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::AppError;

pub const TYPE_KEY: &str = "_TYPE";
pub const MEMBERS_KEY: &str = "members";
pub const MEMBER_CONFIG_KEY: &str = "config";
/// Agent field holding the tools the agent may call, as JSON text.
pub const TOOLS_KEY: &str = "tools.data";

/// Legacy numeric tool row id -> stable tool uuid.
pub type ToolIdMap = HashMap<i64, String>;

/// A config document split by its `_TYPE` discriminator.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigDoc {
    Agent(Map<String, Value>),
    Workflow(Map<String, Value>),
    Block(Map<String, Value>),
    User(Map<String, Value>),
    /// Unknown `_TYPE`, or not an object at all.
    Other(Value),
}

impl ConfigDoc {
    pub fn classify(value: Value) -> Self {
        let map = match value {
            Value::Object(map) => map,
            other => return ConfigDoc::Other(other),
        };
        let kind = match map.get(TYPE_KEY) {
            None => Some("agent"),
            Some(Value::String(t)) => Some(t.as_str()),
            Some(_) => None,
        };
        match kind {
            Some("agent") => ConfigDoc::Agent(map),
            Some("workflow") => ConfigDoc::Workflow(map),
            Some("block") => ConfigDoc::Block(map),
            Some("user") => ConfigDoc::User(map),
            _ => ConfigDoc::Other(Value::Object(map)),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            ConfigDoc::Agent(map)
            | ConfigDoc::Workflow(map)
            | ConfigDoc::Block(map)
            | ConfigDoc::User(map) => Value::Object(map),
            ConfigDoc::Other(value) => value,
        }
    }
}

/// Replace legacy numeric tool ids with stable uuids throughout a document.
///
/// Unmapped numeric ids are dropped. Workflow members keep their position and
/// every field except `config`, which is rewritten recursively.
pub fn rewrite_tool_refs(document: Value, id_map: &ToolIdMap) -> Value {
    match ConfigDoc::classify(document) {
        ConfigDoc::Agent(mut map) => {
            if let Some(ids) = map.get(TOOLS_KEY).and_then(|raw| resolve_tool_ids(raw, id_map)) {
                let text = Value::Array(ids.into_iter().map(Value::String).collect()).to_string();
                map.insert(TOOLS_KEY.to_string(), Value::String(text));
            }
            Value::Object(map)
        }
        ConfigDoc::Workflow(mut map) => {
            if let Some(Value::Array(members)) = map.get_mut(MEMBERS_KEY) {
                for member in members.iter_mut() {
                    if let Value::Object(fields) = member {
                        if let Some(config) = fields.get_mut(MEMBER_CONFIG_KEY) {
                            *config = rewrite_tool_refs(config.take(), id_map);
                        }
                    }
                }
            }
            Value::Object(map)
        }
        doc @ (ConfigDoc::Block(_) | ConfigDoc::User(_) | ConfigDoc::Other(_)) => doc.into_value(),
    }
}

/// Parse, rewrite and re-serialize one stored config column.
pub fn rewrite_row_config(text: &str, id_map: &ToolIdMap) -> Result<String, AppError> {
    let doc: Value = serde_json::from_str(text)?;
    Ok(serde_json::to_string(&rewrite_tool_refs(doc, id_map))?)
}

/// Resolve the entries of a `tools.data` field. `None` leaves the field as is.
fn resolve_tool_ids(raw: &Value, id_map: &ToolIdMap) -> Option<Vec<String>> {
    let parsed;
    let entries = match raw {
        Value::Array(items) => items,
        Value::String(text) => {
            parsed = serde_json::from_str::<Value>(text).ok()?;
            parsed.as_array()?
        }
        _ => return None,
    };

    let mut ids: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        let reference = match entry {
            Value::Object(obj) => obj.get("id"),
            other => Some(other),
        };
        let Some(resolved) = reference.and_then(|r| resolve_one(r, id_map)) else {
            continue;
        };
        if !ids.contains(&resolved) {
            ids.push(resolved);
        }
    }
    Some(ids)
}

fn resolve_one(reference: &Value, id_map: &ToolIdMap) -> Option<String> {
    match reference {
        Value::Number(n) => n.as_i64().and_then(|id| id_map.get(&id).cloned()),
        Value::String(s) if is_legacy_id(s) => {
            s.parse::<i64>().ok().and_then(|id| id_map.get(&id).cloned())
        }
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn is_legacy_id(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
