//! Storage collaborator seen by the record components.

use async_trait::async_trait;
use tradedesk_core::ServiceError;
use tradedesk_store::{KvOps, KvStore};

use crate::entity::Entity;

/// A named collection of records of one entity type.
///
/// Updates overwrite the whole record by id. Both `update` and `delete`
/// report `ServiceError::NotFound` when the id is absent.
#[async_trait]
pub trait Collection<E: Entity>: Send + Sync {
    /// Every record, in storage order.
    async fn list(&self) -> Result<Vec<E>, ServiceError>;

    /// Insert a new record. Storage assigns the id; any id on `record` is ignored.
    async fn create(&self, record: E) -> Result<E, ServiceError>;

    /// Overwrite the record with `record.id()`. Returns what was stored.
    async fn update(&self, record: &E) -> Result<E, ServiceError>;

    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
}

#[async_trait]
impl<E: Entity + KvStore> Collection<E> for KvOps<E> {
    async fn list(&self) -> Result<Vec<E>, ServiceError> {
        KvOps::list(self)
    }

    async fn create(&self, record: E) -> Result<E, ServiceError> {
        self.save_new(record)
    }

    async fn update(&self, record: &E) -> Result<E, ServiceError> {
        self.save(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        KvOps::delete(self, id)
    }
}
