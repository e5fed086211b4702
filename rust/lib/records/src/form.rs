//! Form collector: validate a draft and create one record.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::collection::Collection;
use crate::draft::{Draft, FieldInput};
use crate::entity::Entity;
use crate::error::RecordError;
use crate::validate::validate_draft;

pub const SAVE_FAILED: &str = "There was an error saving the record. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A one-line message shown after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, message: message.into() }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Renderable state of a form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormState {
    pub draft: Draft,
    /// Field name → message.
    pub errors: BTreeMap<String, String>,
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl FormState {
    fn empty<E: Entity>() -> Self {
        Self {
            draft: Draft::empty(E::FIELDS),
            errors: BTreeMap::new(),
            busy: false,
            notice: None,
        }
    }
}

/// Collects field values for a new `E` and writes it through a [`Collection`].
pub struct FormCollector<E: Entity> {
    collection: Arc<dyn Collection<E>>,
    state: FormState,
}

impl<E: Entity> FormCollector<E> {
    pub fn new(collection: Arc<dyn Collection<E>>) -> Self {
        Self {
            collection,
            state: FormState::empty::<E>(),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn draft(&self) -> &Draft {
        &self.state.draft
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.state.errors.get(field).map(String::as_str)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.state.notice.as_ref()
    }

    /// Update one field. Clears that field's error and any notice.
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldInput>) -> Result<(), RecordError> {
        self.state.draft.set(name, value)?;
        self.state.errors.remove(name);
        self.state.notice = None;
        Ok(())
    }

    /// Validate and create the record.
    ///
    /// An invalid draft never reaches storage. On success the draft is
    /// cleared; on storage failure it is kept as typed.
    pub async fn submit(&mut self) -> Result<E, RecordError> {
        self.state.notice = None;
        self.state.errors.clear();

        if let Err(err) = validate_draft(&self.state.draft) {
            if let Some((field, message)) = err.field_error() {
                self.state.errors.insert(field.to_string(), message.to_string());
            }
            return Err(err);
        }

        let record: E = self.state.draft.to_entity()?;
        self.state.busy = true;
        let result = self.collection.create(record).await;
        self.state.busy = false;

        match result {
            Ok(created) => {
                info!("created {} {}", E::COLLECTION, created.id());
                self.state.draft = Draft::empty(E::FIELDS);
                self.state.notice = Some(Notice::success(format!("{} saved successfully!", E::LABEL)));
                Ok(created)
            }
            Err(e) => {
                warn!("create {} failed: {}", E::COLLECTION, e);
                self.state.notice = Some(Notice::error(format!("{} ({})", SAVE_FAILED, e)));
                Err(RecordError::Storage(e))
            }
        }
    }

    /// Discard the draft and any errors.
    pub fn cancel(&mut self) {
        self.state = FormState::empty::<E>();
    }
}
