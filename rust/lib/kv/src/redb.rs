use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};
use tracing::debug;

use crate::error::{storage, KVError};
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("records");

/// RedbStore is a KVStore backed by redb, a pure-Rust embedded
/// key-value database. Every write runs in its own transaction, so each
/// single-record operation is atomic.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(storage)?;

        // Create the table up front so readers never see a missing table.
        let write_txn = db.begin_write().map_err(storage)?;
        {
            let _table = write_txn.open_table(TABLE).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;

        debug!("opened redb store at {}", path.display());
        Ok(Self { db: Arc::new(db) })
    }

    /// Insert `value` when the key's presence equals `must_exist`. The
    /// check and the write share one write transaction.
    fn write_if(&self, key: &str, value: &[u8], must_exist: bool) -> Result<bool, KVError> {
        let write_txn = self.db.begin_write().map_err(storage)?;
        let written = {
            let mut table = write_txn.open_table(TABLE).map_err(storage)?;
            let exists = table.get(key).map_err(storage)?.is_some();
            if exists == must_exist {
                table.insert(key, value).map_err(storage)?;
            }
            exists == must_exist
        };
        if written {
            write_txn.commit().map_err(storage)?;
        } else {
            write_txn.abort().map_err(storage)?;
        }
        Ok(written)
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn.open_table(TABLE).map_err(storage)?;
        let value = table.get(key).map_err(storage)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(storage)?;
            table.insert(key, value).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;
        Ok(())
    }

    fn insert_new(&self, key: &str, value: &[u8]) -> Result<bool, KVError> {
        self.write_if(key, value, false)
    }

    fn replace(&self, key: &str, value: &[u8]) -> Result<bool, KVError> {
        self.write_if(key, value, true)
    }

    fn delete(&self, key: &str) -> Result<bool, KVError> {
        let write_txn = self.db.begin_write().map_err(storage)?;
        let existed = {
            let mut table = write_txn.open_table(TABLE).map_err(storage)?;
            let removed = table.remove(key).map_err(storage)?;
            removed.is_some()
        };
        write_txn.commit().map_err(storage)?;
        Ok(existed)
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn.open_table(TABLE).map_err(storage)?;

        let mut results = Vec::new();
        for entry in table.range(prefix..).map_err(storage)? {
            let (key, value) = entry.map_err(storage)?;
            let key = key.value().to_string();
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key, value.value().to_vec()));
        }
        Ok(results)
    }
}
