//! Record manager components.
//!
//! Every master screen is one of two shapes: a [`FormCollector`] that
//! validates a draft and creates a record, or a [`RecordBrowser`] that
//! loads a collection, filters it, and edits or deletes rows in place.
//! Both are generic over an [`Entity`] and driven by its field table, and
//! both talk to storage only through the [`Collection`] trait.

pub mod browser;
pub mod collection;
pub mod draft;
pub mod entity;
pub mod error;
pub mod form;
pub mod schema;
pub mod validate;

#[cfg(test)]
pub(crate) mod testutil;

pub use browser::{LoadState, RecordBrowser};
pub use collection::Collection;
pub use draft::{Draft, FieldInput, FieldValue};
pub use entity::Entity;
pub use error::RecordError;
pub use form::{FormCollector, FormState, Notice, NoticeKind};
pub use schema::{FieldDef, FieldKind, Rule};
pub use validate::{validate_draft, validate_record};
