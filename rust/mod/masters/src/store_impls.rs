//! KvStore implementations for master models.
//!
//! Keys are `masters:{Collection}:{id}`. Ids are always assigned on
//! create, so a client-supplied id never reaches storage. Every write is
//! checked against the model's field table.

use tradedesk_core::{new_id, ServiceError};
use tradedesk_records::{validate_record, Entity};
use tradedesk_store::KvStore;

use crate::model::*;

macro_rules! master_kv {
    ($model:ty, $prefix:literal) => {
        impl KvStore for $model {
            fn kind() -> &'static str {
                <$model as Entity>::LABEL
            }

            fn kv_prefix() -> &'static str {
                $prefix
            }

            fn key_value(&self) -> String {
                self.id.clone()
            }

            fn set_key(&mut self, id: &str) {
                self.id = id.to_string();
            }

            fn before_create(&mut self) {
                self.id = new_id();
            }

            fn validate(&self) -> Result<(), ServiceError> {
                validate_record(self)
            }
        }
    };
}

master_kv!(Agent, "masters:Agent:");
master_kv!(Party, "masters:Party:");
master_kv!(Unit, "masters:Unit:");
master_kv!(Hsn, "masters:HSN:");
master_kv!(Item, "masters:Item:");
master_kv!(Transport, "masters:Transport:");
