//! TradeDesk store layer.
//!
//! A model implements [`KvStore`] to declare its key prefix, key field and
//! write hooks. [`KvOps`] provides the CRUD operations on top of a
//! `tradedesk_kv::KVStore` backend, and [`collection_router`] exposes them
//! over HTTP.
//!
//! ```ignore
//! impl KvStore for Unit {
//!     fn kind() -> &'static str { "Unit" }
//!     fn kv_prefix() -> &'static str { "masters:Unit:" }
//!     fn key_value(&self) -> String { self.id.clone() }
//!     fn set_key(&mut self, id: &str) { self.id = id.to_string(); }
//! }
//! ```

pub mod kv;
pub mod router;

pub use kv::{KvOps, KvStore};
pub use router::collection_router;
