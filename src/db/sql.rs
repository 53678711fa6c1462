//! Thin execution facade over a single SQLite connection.
//!
//! Migration steps talk to the database only through [`SqlSession`], which
//! keeps them agnostic of which file they run against: the orchestrator hands
//! them a session opened on the working copy, the fresh-install path hands
//! them one opened on the new primary file.

use std::path::{Path, PathBuf};

use rusqlite::types::FromSql;
use rusqlite::{Connection, OptionalExtension, Params, Row};

use crate::error::AppError;

/// Suffix of the working copy the upgrade runs against.
pub const COPY_SUFFIX: &str = ".copy";

/// Location of the primary database file.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn db_path(&self) -> &Path {
        &self.path
    }

    /// Sibling path of the working copy (`<primary>.copy`).
    pub fn copy_path(&self) -> PathBuf {
        with_suffix(&self.path, COPY_SUFFIX)
    }

    /// Open a session whose statements all target the working copy.
    /// The primary file is never opened by this session.
    pub fn write_to_copy(&self) -> Result<SqlSession, AppError> {
        SqlSession::open(self.copy_path())
    }
}

/// Append a raw suffix to a path without touching its extension.
pub(crate) fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

/// A connection scoped to one database file.
pub struct SqlSession {
    conn: Connection,
    path: PathBuf,
}

impl SqlSession {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let conn = Connection::open(&path)?;
        Ok(Self { conn, path })
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self, AppError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize, AppError> {
        Ok(self.conn.execute(sql, params)?)
    }

    pub fn execute_batch(&self, sql: &str) -> Result<(), AppError> {
        Ok(self.conn.execute_batch(sql)?)
    }

    /// First column of the first row; `None` when the query yields no row.
    pub fn get_scalar<T: FromSql, P: Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Option<T>, AppError> {
        Ok(self
            .conn
            .query_row(sql, params, |row| row.get::<_, T>(0))
            .optional()?)
    }

    /// All rows, mapped one by one.
    pub fn get_results<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>, AppError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Two-column rows as `(key, value)` pairs, in query order.
    pub fn get_pairs<K, V, P>(&self, sql: &str, params: P) -> Result<Vec<(K, V)>, AppError>
    where
        K: FromSql,
        V: FromSql,
        P: Params,
    {
        self.get_results(sql, params, |row| Ok((row.get::<_, K>(0)?, row.get::<_, V>(1)?)))
    }

    pub fn table_exists(&self, table: &str) -> Result<bool, AppError> {
        let count: Option<i64> = self.get_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
        )?;
        Ok(count.unwrap_or(0) > 0)
    }

    /// Number of columns; zero for a missing table.
    pub fn column_count(&self, table: &str) -> Result<i64, AppError> {
        let count: Option<i64> =
            self.get_scalar("SELECT COUNT(*) FROM pragma_table_info(?1)", [table])?;
        Ok(count.unwrap_or(0))
    }

    pub fn column_exists(&self, table: &str, column: &str) -> Result<bool, AppError> {
        let count: Option<i64> = self.get_scalar(
            "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
            [table, column],
        )?;
        Ok(count.unwrap_or(0) > 0)
    }

    /// Declared type of a column, upper-cased; `None` if table or column is missing.
    pub fn column_type(&self, table: &str, column: &str) -> Result<Option<String>, AppError> {
        let decl: Option<String> = self.get_scalar(
            "SELECT type FROM pragma_table_info(?1) WHERE name = ?2",
            [table, column],
        )?;
        Ok(decl.map(|t| t.trim().to_ascii_uppercase()))
    }

    pub fn vacuum(&self) -> Result<(), AppError> {
        self.conn.execute_batch("VACUUM")?;
        Ok(())
    }

    /// Close the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> Result<(), AppError> {
        self.conn.close().map_err(|(_, e)| AppError::Database(e))
    }
}
