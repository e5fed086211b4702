use serde::{Deserialize, Serialize};
use tradedesk_records::{Entity, FieldDef, Rule};

use super::states::{INDIAN_STATES, OPENING_TYPES};

/// Party: a customer or supplier account with two opening ledgers.
///
/// `agent` and `transport` hold names, not ids, and are never checked
/// against the Agent or Transport collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Party {
    pub id: String,
    pub code: String,
    pub party_name: String,
    pub group: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone_no: String,
    pub email: String,
    pub agent: String,
    pub gst: String,
    pub transport: String,
    pub opening_type1: String,
    pub opening_date1: String,
    pub opening_balance1: String,
    pub discount1: String,
    pub closing_balance: String,
    pub opening_type2: String,
    pub opening_date2: String,
    pub opening_balance2: String,
    pub discount2: String,
    pub private_marka: String,
}

const FIELDS: &[FieldDef] = &[
    FieldDef::text("code", "Code"),
    FieldDef::text("partyName", "Party Name").required(),
    FieldDef::text("group", "Group"),
    FieldDef::text("address", "Address"),
    FieldDef::text("city", "City"),
    FieldDef::select("state", "State", INDIAN_STATES),
    FieldDef::tel(
        "phoneNo",
        "Phone no.",
        Rule::Mobile { message: "Please enter a valid 10-digit Indian mobile number" },
    ),
    FieldDef::email("email", "Email"),
    FieldDef::text("agent", "Agent"),
    FieldDef::text("gst", "GST"),
    FieldDef::text("transport", "Transport"),
    FieldDef::select("openingType1", "Opening Type 1", OPENING_TYPES).required(),
    FieldDef::date("openingDate1", "Opening Date 1"),
    FieldDef::number("openingBalance1", "Opening Balance 1"),
    FieldDef::number("discount1", "Discount 1 (in %)"),
    FieldDef::number("closingBalance", "Closing Balance"),
    FieldDef::select("openingType2", "Opening Type 2", OPENING_TYPES),
    FieldDef::date("openingDate2", "Opening Date 2"),
    FieldDef::number("openingBalance2", "Opening Balance 2"),
    FieldDef::number("discount2", "Discount 2 (in %)"),
    FieldDef::text("privateMarka", "Private Marka"),
];

impl Entity for Party {
    const COLLECTION: &'static str = "Party";
    const LABEL: &'static str = "Party";
    const PATH: &'static str = "parties";
    const FIELDS: &'static [FieldDef] = FIELDS;
    const DISPLAY_FIELD: &'static str = "partyName";

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.party_name
    }
}
