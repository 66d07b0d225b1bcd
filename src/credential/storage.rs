use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, Connection};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tracing::{debug, info, warn};

/// Local persistent key/value storage.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// libSQL-backed storage that degrades to an in-memory map when the
/// database is unavailable.
pub struct LocalStorage {
    conn: Option<Connection>,
    // In-memory fallback storage
    fallback: Arc<Mutex<HashMap<String, String>>>,
}

impl LocalStorage {
    pub async fn new(db_path: &str) -> Result<Self> {
        let mut storage = Self::in_memory();

        match storage.init_database(db_path).await {
            Ok(()) => {
                info!("Key/value storage initialized: {}", db_path);
            }
            Err(e) => {
                warn!(
                    "Key/value storage initialization failed, using in-memory fallback: {}",
                    e
                );
            }
        }

        Ok(storage)
    }

    /// Storage with no database behind it at all.
    pub fn in_memory() -> Self {
        Self {
            conn: None,
            fallback: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn init_database(&mut self, db_path: &str) -> Result<()> {
        let db = Builder::new_local(db_path).build().await?;

        // Keep one connection: every fresh connection to ":memory:" is a new database
        let conn = db.connect()?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            (),
        )
        .await?;

        self.conn = Some(conn);
        Ok(())
    }

    async fn get_from_db(&self, conn: &Connection, key: &str) -> Result<Option<String>> {
        let mut rows = conn
            .query("SELECT value FROM kv_store WHERE key = ?", [key])
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }

    async fn set_in_db(&self, conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            (key, value, Utc::now().to_rfc3339()),
        )
        .await?;
        Ok(())
    }

    fn get_from_fallback(&self, key: &str) -> Result<Option<String>> {
        let fallback = self
            .fallback
            .lock()
            .map_err(|e| Error::internal(format!("Mutex lock failed: {e}")))?;
        Ok(fallback.get(key).cloned())
    }

    fn set_in_fallback(&self, key: &str, value: &str) -> Result<()> {
        let mut fallback = self
            .fallback
            .lock()
            .map_err(|e| Error::internal(format!("Mutex lock failed: {e}")))?;
        fallback.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if let Some(ref conn) = self.conn {
            match self.get_from_db(conn, key).await {
                Ok(Some(value)) => {
                    debug!("Read key '{}' from database", key);
                    return Ok(Some(value));
                }
                // A value may have landed in the fallback after a failed write
                Ok(None) => {}
                Err(e) => {
                    warn!("Failed to read from database, using fallback: {}", e);
                }
            }
        }

        self.get_from_fallback(key)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if let Some(ref conn) = self.conn {
            match self.set_in_db(conn, key, value).await {
                Ok(()) => {
                    debug!("Wrote key '{}' to database", key);
                    return Ok(());
                }
                Err(e) => {
                    warn!("Failed to write to database, using fallback: {}", e);
                }
            }
        }

        self.set_in_fallback(key, value)
    }
}
