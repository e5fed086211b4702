//! Record browser: list, search, and edit or delete rows in place.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::collection::Collection;
use crate::draft::{Draft, FieldInput};
use crate::entity::Entity;
use crate::error::RecordError;
use crate::form::Notice;
use crate::validate::validate_draft;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "lowercase")]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// The single expanded row and its edit draft.
#[derive(Debug, Clone, PartialEq)]
struct Expanded {
    id: String,
    draft: Draft,
    field_error: Option<(String, String)>,
}

/// Browses one collection of `E`.
///
/// Holds the canonical list as loaded from storage and the displayed list
/// after filtering. At most one row is expanded for editing.
pub struct RecordBrowser<E: Entity> {
    collection: Arc<dyn Collection<E>>,
    load_state: LoadState,
    records: Vec<E>,
    displayed: Vec<E>,
    query: String,
    expanded: Option<Expanded>,
    notice: Option<Notice>,
}

impl<E: Entity> RecordBrowser<E> {
    pub fn new(collection: Arc<dyn Collection<E>>) -> Self {
        Self {
            collection,
            load_state: LoadState::Idle,
            records: Vec::new(),
            displayed: Vec::new(),
            query: String::new(),
            expanded: None,
            notice: None,
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Canonical list, in storage order.
    pub fn records(&self) -> &[E] {
        &self.records
    }

    /// Rows matching the last applied search.
    pub fn displayed(&self) -> &[E] {
        &self.displayed
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn expanded_id(&self) -> Option<&str> {
        self.expanded.as_ref().map(|e| e.id.as_str())
    }

    /// Edit draft of the expanded row.
    pub fn draft(&self) -> Option<&Draft> {
        self.expanded.as_ref().map(|e| &e.draft)
    }

    /// Validation failure of the last save, as (field, message).
    pub fn field_error(&self) -> Option<(&str, &str)> {
        self.expanded
            .as_ref()
            .and_then(|e| e.field_error.as_ref())
            .map(|(f, m)| (f.as_str(), m.as_str()))
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Fetch the whole collection. Resets the query and any expansion.
    pub async fn load(&mut self) -> Result<(), RecordError> {
        self.load_state = LoadState::Loading;
        self.notice = None;

        match self.collection.list().await {
            Ok(items) => {
                debug!("loaded {} {} records", items.len(), E::COLLECTION);
                self.displayed = items.clone();
                self.records = items;
                self.query.clear();
                self.expanded = None;
                self.load_state = LoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                warn!("load {} failed: {}", E::COLLECTION, e);
                self.load_state = LoadState::Failed(e.to_string());
                self.notice = Some(Notice::error(format!("Failed to load {} records. ({})", E::LABEL, e)));
                Err(RecordError::Storage(e))
            }
        }
    }

    /// Record the query. An empty query shows every row immediately.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        if self.query.is_empty() {
            self.displayed = self.records.clone();
        }
    }

    /// Apply the current query to the canonical list.
    ///
    /// Case-insensitive substring match on the display field, with the
    /// query as typed. A blank query shows everything. Storage order is kept.
    pub fn search(&mut self) {
        self.displayed = if self.query.trim().is_empty() {
            self.records.clone()
        } else {
            let needle = self.query.to_lowercase();
            self.records
                .iter()
                .filter(|r| r.display_name().to_lowercase().contains(&needle))
                .cloned()
                .collect()
        };
    }

    pub fn search_for(&mut self, query: &str) {
        self.set_query(query);
        self.search();
    }

    /// Expand `id`, or collapse it if it is already expanded.
    ///
    /// Expanding discards the draft of any other expanded row.
    pub fn toggle_expand(&mut self, id: &str) -> Result<(), RecordError> {
        if self.expanded_id() == Some(id) {
            self.expanded = None;
            return Ok(());
        }
        let record = self
            .records
            .iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| RecordError::UnknownRecord(id.to_string()))?;
        self.expanded = Some(Expanded {
            id: id.to_string(),
            draft: Draft::from_entity(record)?,
            field_error: None,
        });
        self.notice = None;
        Ok(())
    }

    /// Edit one field of the expanded row's draft.
    pub fn edit_field(&mut self, name: &str, value: impl Into<FieldInput>) -> Result<(), RecordError> {
        if name == "id" {
            return Err(RecordError::ImmutableField(name.to_string()));
        }
        let expanded = self.expanded.as_mut().ok_or(RecordError::NoSelection)?;
        expanded.draft.set(name, value)?;
        if expanded.field_error.as_ref().is_some_and(|(f, _)| f == name) {
            expanded.field_error = None;
        }
        Ok(())
    }

    /// Validate and write the expanded row's draft.
    ///
    /// On success the row is replaced in both lists by the stored record and
    /// collapsed. On failure the row stays expanded with its draft.
    pub async fn save(&mut self) -> Result<E, RecordError> {
        let expanded = self.expanded.as_mut().ok_or(RecordError::NoSelection)?;
        expanded.field_error = None;
        self.notice = None;

        if let Err(err) = validate_draft(&expanded.draft) {
            if let Some((field, message)) = err.field_error() {
                expanded.field_error = Some((field.to_string(), message.to_string()));
            }
            return Err(err);
        }

        let record: E = expanded.draft.to_entity()?;
        match self.collection.update(&record).await {
            Ok(stored) => {
                info!("updated {} {}", E::COLLECTION, stored.id());
                replace_by_id(&mut self.records, &stored);
                replace_by_id(&mut self.displayed, &stored);
                self.expanded = None;
                self.notice = Some(Notice::success(format!("{} updated successfully!", E::LABEL)));
                Ok(stored)
            }
            Err(e) => {
                warn!("update {} {} failed: {}", E::COLLECTION, record.id(), e);
                self.notice = Some(Notice::error(format!("Failed to update {}. ({})", E::LABEL, e)));
                Err(RecordError::Storage(e))
            }
        }
    }

    /// Delete `id` in storage, then drop it from both lists.
    pub async fn remove(&mut self, id: &str) -> Result<(), RecordError> {
        self.notice = None;
        match self.collection.delete(id).await {
            Ok(()) => {
                info!("deleted {} {}", E::COLLECTION, id);
                self.records.retain(|r| r.id() != id);
                self.displayed.retain(|r| r.id() != id);
                if self.expanded_id() == Some(id) {
                    self.expanded = None;
                }
                self.notice = Some(Notice::success(format!("{} deleted successfully!", E::LABEL)));
                Ok(())
            }
            Err(e) => {
                warn!("delete {} {} failed: {}", E::COLLECTION, id, e);
                self.notice = Some(Notice::error(format!("Failed to delete {}. ({})", E::LABEL, e)));
                Err(RecordError::Storage(e))
            }
        }
    }
}

fn replace_by_id<E: Entity>(rows: &mut [E], stored: &E) {
    if let Some(slot) = rows.iter_mut().find(|r| r.id() == stored.id()) {
        *slot = stored.clone();
    }
}
