use crate::error::KVError;

/// KVStore provides a flat key-value storage interface.
///
/// Keys are namespaced by collection: `masters:Agent:{id}`,
/// `masters:Unit:{id}`. A collection is read back with a prefix scan.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair, overwriting any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Write a key only if it is absent, in one transaction.
    /// Returns false (writing nothing) if the key already exists.
    fn insert_new(&self, key: &str, value: &[u8]) -> Result<bool, KVError>;

    /// Overwrite a key only if it exists, in one transaction.
    /// Returns false (writing nothing) if the key is absent.
    fn replace(&self, key: &str, value: &[u8]) -> Result<bool, KVError>;

    /// Delete a key. Returns true if the key existed.
    fn delete(&self, key: &str) -> Result<bool, KVError>;

    /// Scan all keys matching a prefix. Returns (key, value) pairs in key order.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;
}
