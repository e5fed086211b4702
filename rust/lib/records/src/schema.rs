//! Field tables.
//!
//! Each entity declares a `&'static [FieldDef]` describing its editable
//! fields in display order. The same table drives validation, draft
//! seeding and the JSON served at `/meta/schema`.

use serde::Serialize;

use crate::entity::Entity;

/// Input kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    /// Decimal number, kept as a string.
    Number,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    Tel,
    Email,
    /// One of a fixed set of options.
    Select(&'static [&'static str]),
    /// Ordered list of strings, edited as comma-separated text.
    List,
}

/// Extra rule applied to a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Rule {
    None,
    /// Exactly 10 ASCII digits. Checked even when the value is empty.
    Phone { message: &'static str },
    /// Indian mobile: 10 digits, first digit 6-9. Checked even when empty.
    Mobile { message: &'static str },
}

/// One field of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    /// Wire name (camelCase).
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub rule: Rule,
}

impl FieldDef {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            required: false,
            rule: Rule::None,
        }
    }

    pub const fn number(name: &'static str, label: &'static str) -> Self {
        Self::text(name, label).kind(FieldKind::Number)
    }

    pub const fn date(name: &'static str, label: &'static str) -> Self {
        Self::text(name, label).kind(FieldKind::Date)
    }

    pub const fn email(name: &'static str, label: &'static str) -> Self {
        Self::text(name, label).kind(FieldKind::Email)
    }

    pub const fn list(name: &'static str, label: &'static str) -> Self {
        Self::text(name, label).kind(FieldKind::List)
    }

    pub const fn select(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self::text(name, label).kind(FieldKind::Select(options))
    }

    /// Telephone field validated by `rule`.
    pub const fn tel(name: &'static str, label: &'static str, rule: Rule) -> Self {
        let mut def = Self::text(name, label).kind(FieldKind::Tel);
        def.rule = rule;
        def
    }

    pub const fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, FieldKind::List)
    }
}

/// Find a field by wire name.
pub fn find_field<'a>(fields: &'a [FieldDef], name: &str) -> Option<&'a FieldDef> {
    fields.iter().find(|f| f.name == name)
}

/// Schema document for one entity.
pub fn schema_json<E: Entity>() -> serde_json::Value {
    serde_json::json!({
        "collection": E::COLLECTION,
        "label": E::LABEL,
        "path": E::PATH,
        "displayField": E::DISPLAY_FIELD,
        "fields": E::FIELDS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::Contact;

    #[test]
    fn builders_compose() {
        const F: FieldDef = FieldDef::select("kind", "Kind", &["a", "b"]).required();
        assert!(F.required);
        assert_eq!(F.kind, FieldKind::Select(&["a", "b"]));
        assert_eq!(F.rule, Rule::None);
    }

    #[test]
    fn find_by_name() {
        assert_eq!(find_field(Contact::FIELDS, "phone").unwrap().label, "Phone");
        assert!(find_field(Contact::FIELDS, "nope").is_none());
    }

    #[test]
    fn schema_serializes() {
        let json = schema_json::<Contact>();
        assert_eq!(json["collection"], "Contact");
        assert_eq!(json["displayField"], "name");

        let fields = json["fields"].as_array().unwrap();
        assert_eq!(fields[0]["name"], "name");
        assert_eq!(fields[0]["required"], true);
        assert_eq!(fields[0]["kind"]["type"], "text");

        let phone = &fields[1];
        assert_eq!(phone["kind"]["type"], "tel");
        assert_eq!(phone["rule"]["type"], "phone");
        assert_eq!(phone["rule"]["message"], "Phone must be 10 digits");

        let kind = fields.iter().find(|f| f["name"] == "kind").unwrap();
        assert_eq!(kind["kind"]["type"], "select");
        assert_eq!(kind["kind"]["options"][1], "debit");
    }
}
