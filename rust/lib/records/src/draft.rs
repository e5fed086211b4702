//! Drafts: the editable, untyped form of a record.

use std::collections::BTreeMap;

use serde::Serialize;
use tradedesk_core::ServiceError;

use crate::entity::Entity;
use crate::error::RecordError;
use crate::schema::{find_field, FieldDef};

/// Current value of one draft field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    fn empty_for(def: &FieldDef) -> Self {
        if def.is_list() {
            FieldValue::List(Vec::new())
        } else {
            FieldValue::Text(String::new())
        }
    }

    /// Empty after trimming, or an empty list.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    /// Text as typed; lists are joined with ", ".
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
        }
    }
}

/// Raw input for a draft field, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for FieldInput {
    fn from(s: &str) -> Self {
        FieldInput::Text(s.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(s: String) -> Self {
        FieldInput::Text(s)
    }
}

impl From<Vec<String>> for FieldInput {
    fn from(items: Vec<String>) -> Self {
        FieldInput::List(items)
    }
}

/// Split comma-separated text into trimmed, non-empty pieces.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Field values of one record being edited.
///
/// Seeded from a field table (all empty) or from an existing record. The
/// `id` is carried along but never editable through [`Draft::set`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Draft {
    #[serde(skip)]
    fields: &'static [FieldDef],
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    values: BTreeMap<String, FieldValue>,
}

impl Draft {
    /// A draft with every field empty.
    pub fn empty(fields: &'static [FieldDef]) -> Self {
        let values = fields
            .iter()
            .map(|f| (f.name.to_string(), FieldValue::empty_for(f)))
            .collect();
        Self {
            fields,
            id: None,
            values,
        }
    }

    /// A draft holding the current values of `record`.
    pub fn from_entity<E: Entity>(record: &E) -> Result<Self, RecordError> {
        let json = serde_json::to_value(record).map_err(codec_err)?;
        let mut draft = Self::empty(E::FIELDS);
        for def in E::FIELDS {
            let value = match json.get(def.name) {
                Some(serde_json::Value::String(s)) => FieldValue::Text(s.clone()),
                Some(serde_json::Value::Array(items)) => FieldValue::List(
                    items
                        .iter()
                        .map(|v| match v {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect(),
                ),
                Some(serde_json::Value::Null) | None => FieldValue::empty_for(def),
                Some(other) => FieldValue::Text(other.to_string()),
            };
            draft.values.insert(def.name.to_string(), value);
        }
        draft.id = Some(record.id().to_string()).filter(|id| !id.is_empty());
        Ok(draft)
    }

    /// Build the entity these values describe.
    pub fn to_entity<E: Entity>(&self) -> Result<E, RecordError> {
        let mut map = serde_json::Map::new();
        if let Some(id) = &self.id {
            map.insert("id".to_string(), serde_json::Value::String(id.clone()));
        }
        for (name, value) in &self.values {
            map.insert(
                name.clone(),
                serde_json::to_value(value).map_err(codec_err)?,
            );
        }
        serde_json::from_value(serde_json::Value::Object(map)).map_err(codec_err)
    }

    /// Update one field from user input.
    ///
    /// Text for a list field is split on commas.
    pub fn set(&mut self, name: &str, input: impl Into<FieldInput>) -> Result<(), RecordError> {
        let def = find_field(self.fields, name)
            .ok_or_else(|| RecordError::UnknownField(name.to_string()))?;
        let value = match (def.is_list(), input.into()) {
            (true, FieldInput::Text(text)) => FieldValue::List(split_list(&text)),
            (true, FieldInput::List(items)) => FieldValue::List(
                items
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
            (false, FieldInput::Text(text)) => FieldValue::Text(text),
            (false, FieldInput::List(items)) => FieldValue::Text(items.join(", ")),
        };
        self.values.insert(def.name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Text of a field; empty if unknown.
    pub fn text(&self, name: &str) -> String {
        self.get(name).map(FieldValue::display).unwrap_or_default()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn fields(&self) -> &'static [FieldDef] {
        self.fields
    }

    /// True when every field is blank.
    pub fn is_blank(&self) -> bool {
        self.values.values().all(FieldValue::is_blank)
    }
}

fn codec_err(e: serde_json::Error) -> RecordError {
    RecordError::Storage(ServiceError::Internal(format!("record codec: {}", e)))
}
