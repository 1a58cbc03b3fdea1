//! services/api/src/adapters/store.rs
//!
//! Concrete implementations of the `KeyValueStore` port: an in-process map and a
//! file-backed embedded database (redb).

use async_trait::async_trait;
use geowatch_core::ports::{KeyValueStore, PortError, PortResult};
use redb::{Database, ReadableDatabase, TableDefinition};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

//=========================================================================================
// In-Memory Store
//=========================================================================================

/// A store that lives as long as the process. Used by tests and as the default
/// when no store path is configured.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.records
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        self.records.write().await.remove(key);
        Ok(())
    }
}

//=========================================================================================
// redb-Backed Store
//=========================================================================================

/// Every record lives in one table.
///
/// Key: record name (e.g. "geowatch_aois")
/// Value: the raw record string, usually JSON
pub const TABLE_RECORDS: TableDefinition<&str, &str> = TableDefinition::new("geowatch_kv_v1");

#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Creates or opens the database file and makes sure the records table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, redb::Error> {
        let db = Database::create(path.as_ref())?;

        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(TABLE_RECORDS)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Runs a redb operation off the async executor.
    async fn run<T, F>(&self, op: F) -> PortResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T, redb::Error> + Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(|e| PortError::Unexpected(format!("store task failed: {}", e)))?
            .map_err(|e| PortError::Unexpected(format!("store error: {}", e)))
    }
}

#[async_trait]
impl KeyValueStore for RedbStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        let key = key.to_string();
        self.run(move |db| {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(TABLE_RECORDS)?;
            let value = table.get(key.as_str())?.map(|v| v.value().to_string());
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(TABLE_RECORDS)?;
                table.insert(key.as_str(), value.as_str())?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        let key = key.to_string();
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(TABLE_RECORDS)?;
                table.remove(key.as_str())?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await
    }
}
