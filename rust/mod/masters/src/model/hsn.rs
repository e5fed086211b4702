use serde::{Deserialize, Serialize};
use tradedesk_records::{Entity, FieldDef};

/// HSN tax code with its GST rate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hsn {
    pub id: String,
    pub hsn_code: String,
    /// Rate in percent, kept as typed.
    pub gst: String,
}

const FIELDS: &[FieldDef] = &[
    FieldDef::text("hsnCode", "HSN Code").required(),
    FieldDef::number("gst", "GST Rate"),
];

impl Entity for Hsn {
    const COLLECTION: &'static str = "HSN";
    const LABEL: &'static str = "HSN";
    const PATH: &'static str = "hsn";
    const FIELDS: &'static [FieldDef] = FIELDS;
    const DISPLAY_FIELD: &'static str = "hsnCode";

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.hsn_code
    }
}
