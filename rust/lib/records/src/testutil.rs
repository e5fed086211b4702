//! Test entity and in-memory collection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tradedesk_core::ServiceError;
use tradedesk_store::KvStore;

use crate::collection::Collection;
use crate::entity::Entity;
use crate::schema::{FieldDef, Rule};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub kind: String,
    pub tags: Vec<String>,
}

const CONTACT_FIELDS: &[FieldDef] = &[
    FieldDef::text("name", "Name").required(),
    FieldDef::tel("phone", "Phone", Rule::Phone { message: "Phone must be 10 digits" }),
    FieldDef::email("email", "Email"),
    FieldDef::select("kind", "Kind", &["credit", "debit"]),
    FieldDef::list("tags", "Tags"),
];

impl Entity for Contact {
    const COLLECTION: &'static str = "Contact";
    const LABEL: &'static str = "Contact";
    const PATH: &'static str = "contacts";
    const FIELDS: &'static [FieldDef] = CONTACT_FIELDS;
    const DISPLAY_FIELD: &'static str = "name";

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl KvStore for Contact {
    fn kind() -> &'static str {
        "Contact"
    }

    fn kv_prefix() -> &'static str {
        "test:Contact:"
    }

    fn key_value(&self) -> String {
        self.id.clone()
    }

    fn set_key(&mut self, id: &str) {
        self.id = id.to_string();
    }

    fn before_create(&mut self) {
        self.id = tradedesk_core::new_id();
    }

    fn validate(&self) -> Result<(), ServiceError> {
        crate::validate::validate_record(self)
    }
}

pub fn contact(id: &str, name: &str) -> Contact {
    Contact {
        id: id.into(),
        name: name.into(),
        phone: "9876543210".into(),
        ..Default::default()
    }
}

/// Collection backed by a Vec, with call counters and an injectable failure.
#[derive(Default)]
pub struct MemoryCollection {
    pub rows: Mutex<Vec<Contact>>,
    pub fail_with: Mutex<Option<ServiceError>>,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
    next_id: AtomicUsize,
}

impl MemoryCollection {
    pub fn with_rows(rows: Vec<Contact>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    pub fn fail(&self, err: ServiceError) {
        *self.fail_with.lock().unwrap() = Some(err);
    }

    pub fn recover(&self) {
        *self.fail_with.lock().unwrap() = None;
    }

    pub fn snapshot(&self) -> Vec<Contact> {
        self.rows.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), ServiceError> {
        match self.fail_with.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Collection<Contact> for MemoryCollection {
    async fn list(&self) -> Result<Vec<Contact>, ServiceError> {
        self.check()?;
        Ok(self.snapshot())
    }

    async fn create(&self, mut record: Contact) -> Result<Contact, ServiceError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        record.id = format!("m{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: &Contact) -> Result<Contact, ServiceError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| ServiceError::NotFound(format!("Contact '{}' not found", record.id)))?;
        *slot = record.clone();
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(ServiceError::NotFound(format!("Contact '{}' not found", id)));
        }
        Ok(())
    }
}
