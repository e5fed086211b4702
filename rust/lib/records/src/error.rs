use thiserror::Error;
use tradedesk_core::ServiceError;

/// Errors reported by the form and browser components.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// A field failed its required check, kind check or rule.
    #[error("{message}")]
    Validation { field: String, message: String },

    /// The field name is not part of the entity's schema.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// No loaded row carries this id.
    #[error("no record with id '{0}'")]
    UnknownRecord(String),

    /// An edit or save was attempted with no expanded row.
    #[error("no row is expanded")]
    NoSelection,

    #[error("field '{0}' cannot be edited")]
    ImmutableField(String),

    /// The storage collaborator failed.
    #[error("{0}")]
    Storage(#[from] ServiceError),
}

impl RecordError {
    /// True when storage reported the record as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecordError::Storage(e) if e.is_not_found())
    }

    /// Field name and message of a validation failure.
    pub fn field_error(&self) -> Option<(&str, &str)> {
        match self {
            RecordError::Validation { field, message } => Some((field, message)),
            _ => None,
        }
    }
}

impl From<RecordError> for ServiceError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::Storage(inner) => inner,
            RecordError::UnknownRecord(id) => ServiceError::NotFound(format!("no record with id '{}'", id)),
            other => ServiceError::Validation(other.to_string()),
        }
    }
}
