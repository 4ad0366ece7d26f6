// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use funddesk_app::{PersistedListState, StateStore};
use rusqlite::{Connection, OptionalExtension, params};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const APP_NAME: &str = "funddesk";

const SCHEMA_SQL: &str = "
CREATE TABLE ui_state (
  key TEXT PRIMARY KEY,
  value TEXT NOT NULL,
  updated_at TEXT NOT NULL
);
";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[("ui_state", &["key", "value", "updated_at"])];

/// Session-scoped key/value store backing list-state persistence.
///
/// The raw `get`/`put` surface is fallible; UI code never touches it
/// directly. [`SessionStateStore`] wraps a handle with the swallowing
/// contract the controllers rely on.
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(SCHEMA_SQL)
                .context("create schema")?;
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM ui_state WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("read ui state for key {key:?}"))
    }

    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = now_rfc3339()?;
        self.conn
            .execute(
                "
                INSERT INTO ui_state (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT (key) DO UPDATE SET value = ?2, updated_at = ?3
                ",
                params![key, value, updated_at],
            )
            .with_context(|| format!("write ui state for key {key:?}"))?;
        Ok(())
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM ui_state WHERE key = ?", params![key])
            .with_context(|| format!("delete ui state for key {key:?}"))?;
        Ok(())
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM ui_state ORDER BY key ASC")
            .context("prepare ui state key query")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .context("query ui state keys")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("collect ui state keys")
    }
}

/// [`StateStore`] over a shared [`SessionStore`]. Persistence is a
/// convenience, not a correctness requirement: read failures, missing
/// keys, and corrupt JSON all load as `None`, and write failures leave
/// the in-memory state authoritative for the rest of the session.
#[derive(Clone)]
pub struct SessionStateStore {
    store: Rc<SessionStore>,
}

impl SessionStateStore {
    pub fn new(store: Rc<SessionStore>) -> Self {
        Self { store }
    }
}

impl StateStore for SessionStateStore {
    fn load(&self, key: &str) -> Option<PersistedListState> {
        let raw = self.store.get(key).ok()??;
        serde_json::from_str(&raw).ok()
    }

    fn save(&self, key: &str, state: &PersistedListState) {
        let Ok(encoded) = serde_json::to_string(state) else {
            return;
        };
        let _ = self.store.put(key, &encoded);
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("FUNDDESK_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set FUNDDESK_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("funddesk.db"))
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            bail!(
                "database is missing required table `{table}`; use a funddesk-compatible database or delete it to recreate"
            );
        }

        let columns = table_column_names(conn, table)?;
        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.contains(&(*column).to_owned()))
            .collect();

        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}; delete the database to recreate it",
                missing.join(", ")
            );
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
            params![table],
            |row| row.get(0),
        )
        .with_context(|| format!("check table `{table}`"))?;
    Ok(count > 0)
}

fn table_column_names(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("prepare column query for `{table}`"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query columns of `{table}`"))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("collect columns of `{table}`"))
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}
