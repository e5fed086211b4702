//! Masters module: the six master-data collections.
//!
//! # Resources
//!
//! - **Agent**: sales agent with commission and opening balance
//! - **Party**: customer/supplier account
//! - **Unit**: unit of measure
//! - **HSN**: tax code with GST rate
//! - **Item**: stock item
//! - **Transport**: carrier
//!
//! Each resource gets list/create/get/update/delete routes under
//! `/masters/{path}`.

pub mod model;
mod store_impls;

use std::sync::Arc;

use axum::Router;
use tradedesk_core::Module;
use tradedesk_kv::KVStore;
use tradedesk_records::schema::schema_json;
use tradedesk_store::{collection_router, KvOps};

use crate::model::*;

pub struct MastersModule {
    kv: Arc<dyn KVStore>,
}

impl MastersModule {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    fn router_for<T>(&self) -> Router
    where
        T: tradedesk_records::Entity + tradedesk_store::KvStore,
    {
        collection_router(KvOps::<T>::new(Arc::clone(&self.kv)), T::PATH)
    }
}

impl Module for MastersModule {
    fn name(&self) -> &str {
        "masters"
    }

    fn routes(&self) -> Router {
        Router::new()
            .merge(self.router_for::<Agent>())
            .merge(self.router_for::<Party>())
            .merge(self.router_for::<Unit>())
            .merge(self.router_for::<Hsn>())
            .merge(self.router_for::<Item>())
            .merge(self.router_for::<Transport>())
    }
}

/// Schema document served at `/meta/schema`.
pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "TradeDesk",
        "modules": [{
            "id": "masters",
            "label": "Masters",
            "resources": [
                schema_json::<Agent>(),
                schema_json::<Party>(),
                schema_json::<Unit>(),
                schema_json::<Hsn>(),
                schema_json::<Item>(),
                schema_json::<Transport>(),
            ],
        }],
    })
}
