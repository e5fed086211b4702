use thiserror::Error;

#[derive(Error, Debug)]
pub enum KVError {
    #[error("storage error: {0}")]
    Storage(String),
}

/// Map any backend error into `KVError::Storage`.
pub(crate) fn storage<E: std::fmt::Display>(e: E) -> KVError {
    KVError::Storage(e.to_string())
}
