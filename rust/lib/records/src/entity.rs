use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::schema::FieldDef;

/// A master record type managed by the form and browser components.
///
/// Implementors are flat structs of string fields plus a storage-assigned
/// `id`, serialized with camelCase field names.
pub trait Entity:
    Serialize + DeserializeOwned + Clone + Default + PartialEq + Send + Sync + 'static
{
    /// Storage collection name ("Agent").
    const COLLECTION: &'static str;

    /// Human label used in notices ("Agent").
    const LABEL: &'static str;

    /// URL segment under `/masters` ("agents").
    const PATH: &'static str;

    /// Editable fields in display order.
    const FIELDS: &'static [FieldDef];

    /// Field searched by the browser and shown as the row title.
    const DISPLAY_FIELD: &'static str;

    fn id(&self) -> &str;

    /// Value of [`Entity::DISPLAY_FIELD`].
    fn display_name(&self) -> &str;
}
