use serde::{Deserialize, Serialize};
use tradedesk_records::{Entity, FieldDef};

/// Item: a stock item. `hsnCode` and `unit` hold plain names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    pub id: String,
    pub item_name: String,
    pub hsn_code: String,
    pub item_types: Vec<String>,
    pub design_code: String,
    pub unit: String,
    pub size1: String,
    pub size2: String,
}

const FIELDS: &[FieldDef] = &[
    FieldDef::text("itemName", "Item Name").required(),
    FieldDef::text("hsnCode", "HSN Code"),
    FieldDef::list("itemTypes", "Item Types"),
    FieldDef::text("designCode", "Design Code"),
    FieldDef::text("unit", "Unit"),
    FieldDef::text("size1", "Size 1"),
    FieldDef::text("size2", "Size 2"),
];

impl Entity for Item {
    const COLLECTION: &'static str = "Item";
    const LABEL: &'static str = "Item";
    const PATH: &'static str = "items";
    const FIELDS: &'static [FieldDef] = FIELDS;
    const DISPLAY_FIELD: &'static str = "itemName";

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.item_name
    }
}
