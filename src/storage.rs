use crate::api::models::ScheduledMessage;
use crate::lists::GroupList;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_KEY: &str = "messagehub_config";
pub const SESSION_KEY: &str = "messagehub_session";
pub const LISTS_KEY: &str = "messagehub_lists";
pub const DRAFTS_KEY: &str = "messagehub_drafts";
pub const SCHEDULED_CACHE_KEY: &str = "messagehub_scheduled_cache";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Backend(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no data directory available")]
    NoDataDir,
    #[error("value under '{key}' is unreadable: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
    #[error("could not serialize '{key}': {source}")]
    Serialize {
        key: String,
        source: serde_json::Error,
    },
    #[error("storage quota exceeded writing '{key}' ({needed} bytes, {limit} allowed)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },
}

/// String key/value persistence. Everything the client keeps between runs
/// goes through this.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Returns whether the key existed.
    fn remove(&mut self, key: &str) -> Result<bool, StoreError>;
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

fn db_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "messagehub", "MessageHub")?;
    let dir = proj.data_dir().to_path_buf();
    Some(dir.join("store.sqlite"))
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// SQLite-backed store in the platform data directory.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open_default() -> Result<Self, StoreError> {
        let path = db_path().ok_or(StoreError::NoDataDir)?;
        Self::open(&path)
    }

    pub fn open(path: &Path) -> Result<Self, StoreError> {
        ensure_dir(path)?;
        let conn = Connection::open(path)?;
        Self::init(&conn)?;
        log::debug!("opened store at {}", path.display());
        Ok(Self { conn })
    }

    fn init(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let value: Option<String> = stmt.query_row(params![key], |row| row.get(0)).optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let now = chrono::Utc::now().timestamp();
        self.conn.execute(
            r#"
            INSERT INTO kv (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value=excluded.value,
                updated_at=excluded.updated_at
            "#,
            params![key, value, now],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        let n = self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(n > 0)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}

/// Process-local store, optionally capped like a browser's storage quota.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the combined size of keys and values, in bytes.
    #[cfg(test)]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: Some(quota),
        }
    }

    fn used_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(limit) = self.quota {
            let needed = self.used_without(key) + key.len() + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Stored API credentials. The phone number is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub api_id: String,
    pub api_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub key: String,
    pub bytes: usize,
}

/// Typed access to the well-known keys on top of any [`KeyValueStore`].
pub struct LocalStore {
    backend: Box<dyn KeyValueStore>,
}

impl LocalStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.backend.get(key)? {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    pub fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.backend.set(key, &text)
    }

    pub fn lists(&self) -> Result<Vec<GroupList>, StoreError> {
        Ok(self.read_json(LISTS_KEY)?.unwrap_or_default())
    }

    pub fn save_lists(&mut self, lists: &[GroupList]) -> Result<(), StoreError> {
        self.write_json(LISTS_KEY, lists)
    }

    pub fn drafts(&self) -> Result<Vec<ScheduledMessage>, StoreError> {
        Ok(self.read_json(DRAFTS_KEY)?.unwrap_or_default())
    }

    pub fn save_drafts(&mut self, drafts: &[ScheduledMessage]) -> Result<(), StoreError> {
        self.write_json(DRAFTS_KEY, drafts)
    }

    pub fn scheduled_cache(&self) -> Result<Vec<ScheduledMessage>, StoreError> {
        Ok(self.read_json(SCHEDULED_CACHE_KEY)?.unwrap_or_default())
    }

    pub fn save_scheduled_cache(&mut self, messages: &[ScheduledMessage]) -> Result<(), StoreError> {
        self.write_json(SCHEDULED_CACHE_KEY, messages)
    }

    pub fn credentials(&self) -> Result<Option<Credentials>, StoreError> {
        self.read_json(CONFIG_KEY)
    }

    pub fn save_credentials(&mut self, creds: &Credentials) -> Result<(), StoreError> {
        self.write_json(CONFIG_KEY, creds)
    }

    /// The session token is kept as a bare string, not JSON.
    pub fn session_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.backend.get(SESSION_KEY)?.filter(|t| !t.is_empty()))
    }

    pub fn save_session_token(&mut self, token: &str) -> Result<(), StoreError> {
        self.backend.set(SESSION_KEY, token)
    }

    pub fn clear_session(&mut self) -> Result<bool, StoreError> {
        self.backend.remove(SESSION_KEY)
    }

    pub fn raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.backend.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        self.backend.remove(key)
    }

    /// Every key with the size of its value.
    pub fn inspect(&self) -> Result<Vec<KeyInfo>, StoreError> {
        let mut out = Vec::new();
        for key in self.backend.keys()? {
            let bytes = self.backend.get(&key)?.map(|v| v.len()).unwrap_or(0);
            out.push(KeyInfo { key, bytes });
        }
        Ok(out)
    }

    /// Remove every key; returns how many were removed.
    pub fn clear(&mut self) -> Result<usize, StoreError> {
        let mut removed = 0;
        for key in self.backend.keys()? {
            if self.backend.remove(&key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Log a failed write as a warning and hand back a message for the user.
/// The caller keeps working with its in-memory state either way.
pub fn warn_unsaved(result: Result<(), StoreError>, what: &str) -> Option<String> {
    match result {
        Ok(()) => None,
        Err(e) => {
            log::warn!("could not save {}: {}", what, e);
            Some(format!("warning: {} not saved ({}); changes kept for this run only", what, e))
        }
    }
}
