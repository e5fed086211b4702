use serde::{Deserialize, Serialize};
use tradedesk_records::{Entity, FieldDef, Rule};

use super::states::INDIAN_STATES;

/// Transport: a carrier used for dispatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transport {
    pub id: String,
    pub transport_name: String,
    pub phone_no: String,
    pub address: String,
    pub city: String,
    pub state: String,
}

const FIELDS: &[FieldDef] = &[
    FieldDef::text("transportName", "Transport Name").required(),
    FieldDef::tel(
        "phoneNo",
        "Phone no.",
        Rule::Phone { message: "Invalid phone number. Must be 10 digits." },
    ),
    FieldDef::text("address", "Address"),
    FieldDef::text("city", "City"),
    FieldDef::select("state", "State", INDIAN_STATES),
];

impl Entity for Transport {
    const COLLECTION: &'static str = "Transport";
    const LABEL: &'static str = "Transport";
    const PATH: &'static str = "transports";
    const FIELDS: &'static [FieldDef] = FIELDS;
    const DISPLAY_FIELD: &'static str = "transportName";

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.transport_name
    }
}
