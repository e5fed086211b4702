use serde::{Deserialize, Serialize};
use tradedesk_records::{Entity, FieldDef, Rule};

use super::states::{INDIAN_STATES, OPENING_TYPES};

/// Agent: a sales agent earning commission on party business.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Agent {
    pub id: String,
    pub name: String,
    /// Percentage.
    pub commission: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone_no: String,
    /// "credit" or "debit".
    pub opening_type: String,
    pub opening_balance: String,
    pub opening_date: String,
    pub closing_balance: String,
}

const FIELDS: &[FieldDef] = &[
    FieldDef::text("name", "Name").required(),
    FieldDef::number("commission", "Commission (in %)"),
    FieldDef::text("address", "Address"),
    FieldDef::text("city", "City"),
    FieldDef::select("state", "State", INDIAN_STATES).required(),
    FieldDef::tel(
        "phoneNo",
        "Phone no.",
        Rule::Phone { message: "Please enter a valid mobile number (10 digits)." },
    ),
    FieldDef::select("openingType", "Opening Type", OPENING_TYPES).required(),
    FieldDef::number("openingBalance", "Opening Balance"),
    FieldDef::date("openingDate", "Opening Date"),
    FieldDef::number("closingBalance", "Closing Balance"),
];

impl Entity for Agent {
    const COLLECTION: &'static str = "Agent";
    const LABEL: &'static str = "Agent";
    const PATH: &'static str = "agents";
    const FIELDS: &'static [FieldDef] = FIELDS;
    const DISPLAY_FIELD: &'static str = "name";

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
