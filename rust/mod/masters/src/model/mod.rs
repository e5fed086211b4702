//! Master record types.
//!
//! Every field is a string on the wire (camelCase); missing fields
//! deserialize to empty. The `id` is assigned by storage on create.

mod agent;
mod hsn;
mod item;
mod party;
mod states;
mod transport;
mod unit;

pub use agent::Agent;
pub use hsn::Hsn;
pub use item::Item;
pub use party::Party;
pub use states::{INDIAN_STATES, OPENING_TYPES};
pub use transport::Transport;
pub use unit::Unit;
