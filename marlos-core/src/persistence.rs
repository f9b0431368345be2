//! SQLite persistence for conversation history and API settings.
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS messages (
//!     id         INTEGER PRIMARY KEY AUTOINCREMENT,
//!     role       TEXT NOT NULL,
//!     text       TEXT NOT NULL,
//!     timestamp  TEXT NOT NULL
//! );
//! CREATE TABLE IF NOT EXISTS settings (
//!     name       TEXT PRIMARY KEY,
//!     data       TEXT NOT NULL,
//!     updated_at TEXT NOT NULL
//! );
//! ```
//!
//! Messages are ordered by `id`. Settings are a single JSON record under
//! the name `api`; an unreadable record loads as defaults.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::{debug, info, warn};

use crate::config::HistoryConfig;
use crate::error::{MarlosError, Result};
use crate::store::{HistoryStore, SettingsStore};
use crate::types::{ApiSettings, ChatMessage, Role};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS messages (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        role       TEXT NOT NULL,
        text       TEXT NOT NULL,
        timestamp  TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS settings (
        name       TEXT PRIMARY KEY,
        data       TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );";

const API_SETTINGS: &str = "api";

/// History and settings backed by one SQLite database.
///
/// ```no_run
/// # use marlos_core::persistence::SqliteStore;
/// # use marlos_core::config::HistoryConfig;
/// # use marlos_core::{ChatMessage, HistoryStore};
/// let store = SqliteStore::open("marlos.db", &HistoryConfig::default())?;
/// store.append(&ChatMessage::user("hola"))?;
/// assert_eq!(store.read_all()?.len(), 1);
/// # Ok::<(), marlos_core::MarlosError>(())
/// ```
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MarlosError::Database`] on SQLite failures.
    pub fn open<P: AsRef<Path>>(path: P, config: &HistoryConfig) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(&db_path, flags)?;

        if config.wal_mode {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        conn.execute_batch(SCHEMA)?;

        info!(
            path = %db_path.display(),
            wal = config.wal_mode,
            "Marlos store opened"
        );

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    /// Open an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`MarlosError::Database`] on SQLite failures.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
        })
    }

    /// Path to the database file (or `:memory:`).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

impl HistoryStore for SqliteStore {
    fn append(&self, message: &ChatMessage) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO messages (role, text, timestamp) VALUES (?1, ?2, ?3)",
            params![
                message.role.as_str(),
                message.text,
                message.meta.timestamp.to_rfc3339()
            ],
        )?;
        debug!(role = %message.role, chars = message.text.len(), "Appended message");
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<ChatMessage>> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare_cached("SELECT id, role, text, timestamp FROM messages ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut messages = Vec::new();
        for row in rows {
            let (id, role, text, timestamp) = row?;
            let Some(role) = Role::parse(&role) else {
                warn!(id, role = %role, "Skipping message with unknown role");
                continue;
            };
            let timestamp = match DateTime::parse_from_rfc3339(&timestamp) {
                Ok(ts) => ts.with_timezone(&Utc),
                Err(e) => {
                    warn!(id, error = %e, "Skipping message with invalid timestamp");
                    continue;
                }
            };
            messages.push(ChatMessage::at(role, text, timestamp));
        }
        Ok(messages)
    }

    fn clear(&self) -> Result<()> {
        let deleted = self.conn.lock().execute("DELETE FROM messages", [])?;
        info!(deleted, "History cleared");
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

impl SettingsStore for SqliteStore {
    fn load(&self) -> Result<ApiSettings> {
        let conn = self.conn.lock();
        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM settings WHERE name = ?1",
                params![API_SETTINGS],
                |row| row.get(0),
            )
            .optional()?;

        let Some(data) = data else {
            return Ok(ApiSettings::default());
        };

        match serde_json::from_str(&data) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!(error = %e, "Stored API settings are unreadable, using defaults");
                Ok(ApiSettings::default())
            }
        }
    }

    fn save(&self, settings: &ApiSettings) -> Result<()> {
        let json =
            serde_json::to_string(settings).map_err(|e| MarlosError::Serialization(e.to_string()))?;
        self.conn.lock().execute(
            "INSERT INTO settings (name, data, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at",
            params![API_SETTINGS, json, Utc::now().to_rfc3339()],
        )?;
        debug!(complete = settings.is_complete(), "Saved API settings");
        Ok(())
    }
}
