//! KvStore trait + KvOps CRUD operations.
//!
//! The model impls `KvStore` to declare its key and hooks.
//! `KvOps<T>` provides list/get/create/update/delete on a KVStore backend.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use tradedesk_core::ServiceError;
use tradedesk_kv::{KVError, KVStore};

/// Trait implemented by models to declare KV storage behavior.
///
/// Hooks have default no-op impls.
pub trait KvStore: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Human-readable record kind, used in error messages ("Agent").
    fn kind() -> &'static str;

    /// KV key prefix: "{module}:{collection}:".
    fn kv_prefix() -> &'static str;

    /// Extract the key value from this instance.
    fn key_value(&self) -> String;

    /// Overwrite the key value. Used when the URL carries the id.
    fn set_key(&mut self, id: &str);

    /// Called before inserting a new record. Use for id assignment.
    fn before_create(&mut self) {}

    /// Called before overwriting an existing record.
    fn before_update(&mut self) {}

    /// Reject records that must not be written.
    fn validate(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// CRUD operations for a KvStore model. Holds a reference to the KV backend.
pub struct KvOps<T: KvStore> {
    kv: Arc<dyn KVStore>,
    _phantom: PhantomData<T>,
}

impl<T: KvStore> Clone for KvOps<T> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.kv))
    }
}

impl<T: KvStore> KvOps<T> {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self {
            kv,
            _phantom: PhantomData,
        }
    }

    fn make_key(id: &str) -> String {
        format!("{}{}", T::kv_prefix(), id)
    }

    fn kv_err(e: KVError) -> ServiceError {
        ServiceError::Storage(e.to_string())
    }

    fn not_found(id: &str) -> ServiceError {
        ServiceError::NotFound(format!("{} '{}' not found", T::kind(), id))
    }

    fn decode(bytes: &[u8]) -> Result<T, ServiceError> {
        serde_json::from_slice(bytes)
            .map_err(|e| ServiceError::Internal(format!("deserialize {}: {}", T::kind(), e)))
    }

    fn encode(record: &T) -> Result<Vec<u8>, ServiceError> {
        serde_json::to_vec(record)
            .map_err(|e| ServiceError::Internal(format!("serialize {}: {}", T::kind(), e)))
    }

    /// Get a record by key value. Returns None if not found.
    pub fn get(&self, id: &str) -> Result<Option<T>, ServiceError> {
        match self.kv.get(&Self::make_key(id)).map_err(Self::kv_err)? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get a record or return NotFound error.
    pub fn get_or_err(&self, id: &str) -> Result<T, ServiceError> {
        self.get(id)?.ok_or_else(|| Self::not_found(id))
    }

    /// List the whole collection in key order.
    pub fn list(&self) -> Result<Vec<T>, ServiceError> {
        let entries = self.kv.scan(T::kv_prefix()).map_err(Self::kv_err)?;
        entries
            .iter()
            .map(|(_key, bytes)| Self::decode(bytes))
            .collect()
    }

    /// Create a new record. Calls before_create, validates, checks for duplicates.
    pub fn save_new(&self, mut record: T) -> Result<T, ServiceError> {
        record.before_create();
        record.validate()?;

        let id = record.key_value();
        if id.is_empty() {
            return Err(ServiceError::Internal(format!(
                "{} has no id after before_create",
                T::kind()
            )));
        }
        let key = Self::make_key(&id);
        let inserted = self
            .kv
            .insert_new(&key, &Self::encode(&record)?)
            .map_err(Self::kv_err)?;
        if !inserted {
            return Err(ServiceError::Conflict(format!(
                "{} '{}' already exists",
                T::kind(),
                id
            )));
        }
        debug!("created {} {}", T::kind(), id);
        Ok(record)
    }

    /// Overwrite an existing record. Calls before_update, validates.
    pub fn save(&self, mut record: T) -> Result<T, ServiceError> {
        record.before_update();
        record.validate()?;

        let id = record.key_value();
        let key = Self::make_key(&id);
        let replaced = self
            .kv
            .replace(&key, &Self::encode(&record)?)
            .map_err(Self::kv_err)?;
        if !replaced {
            return Err(Self::not_found(&id));
        }
        debug!("updated {} {}", T::kind(), id);
        Ok(record)
    }

    /// Delete a record by key value. NotFound if it does not exist.
    pub fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let existed = self.kv.delete(&Self::make_key(id)).map_err(Self::kv_err)?;
        if !existed {
            return Err(Self::not_found(id));
        }
        debug!("deleted {} {}", T::kind(), id);
        Ok(())
    }
}
