use serde::{Deserialize, Serialize};
use tradedesk_records::{Entity, FieldDef};

/// Unit of measure ("Box", "Pcs").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Unit {
    pub id: String,
    pub unit: String,
}

const FIELDS: &[FieldDef] = &[FieldDef::text("unit", "Unit").required()];

impl Entity for Unit {
    const COLLECTION: &'static str = "Unit";
    const LABEL: &'static str = "Unit";
    const PATH: &'static str = "units";
    const FIELDS: &'static [FieldDef] = FIELDS;
    const DISPLAY_FIELD: &'static str = "unit";

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.unit
    }
}
