//! Field validation.

use chrono::NaiveDate;
use tradedesk_core::ServiceError;

use crate::draft::{Draft, FieldValue};
use crate::entity::Entity;
use crate::error::RecordError;
use crate::schema::{FieldDef, FieldKind, Rule};

/// Check one field value. Returns the user-facing message on failure.
pub fn check_field(def: &FieldDef, value: &FieldValue) -> Result<(), String> {
    if def.required && value.is_blank() {
        return Err(format!("{} is required", def.label));
    }

    let text = match value {
        FieldValue::Text(s) => s.trim(),
        FieldValue::List(_) => return Ok(()),
    };

    match def.rule {
        Rule::None => {}
        Rule::Phone { message } => {
            if !is_phone(text) {
                return Err(message.to_string());
            }
        }
        Rule::Mobile { message } => {
            if !is_mobile(text) {
                return Err(message.to_string());
            }
        }
    }

    if text.is_empty() {
        return Ok(());
    }

    match def.kind {
        FieldKind::Number if !is_number(text) => Err(format!("{} must be a number", def.label)),
        FieldKind::Date if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err() => {
            Err(format!("{} must be a date (YYYY-MM-DD)", def.label))
        }
        FieldKind::Email if !is_email(text) => {
            Err(format!("{} must be a valid email address", def.label))
        }
        FieldKind::Select(options) if !options.contains(&text) => Err(format!(
            "{} must be one of: {}",
            def.label,
            options.join(", ")
        )),
        _ => Ok(()),
    }
}

/// Validate a draft against its field table, in declaration order.
/// Stops at the first failure.
pub fn validate_draft(draft: &Draft) -> Result<(), RecordError> {
    for def in draft.fields() {
        let blank = FieldValue::Text(String::new());
        let value = draft.get(def.name).unwrap_or(&blank);
        check_field(def, value).map_err(|message| RecordError::Validation {
            field: def.name.to_string(),
            message,
        })?;
    }
    Ok(())
}

/// Validate a typed record. Used by the storage layer before writes.
pub fn validate_record<E: Entity>(record: &E) -> Result<(), ServiceError> {
    let draft = Draft::from_entity(record).map_err(ServiceError::from)?;
    validate_draft(&draft).map_err(|e| ServiceError::Validation(e.to_string()))
}

fn is_phone(s: &str) -> bool {
    s.len() == 10 && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_mobile(s: &str) -> bool {
    is_phone(s) && matches!(s.as_bytes()[0], b'6'..=b'9')
}

fn is_number(s: &str) -> bool {
    s.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

fn is_email(s: &str) -> bool {
    let mut parts = s.splitn(2, '@');
    let (local, domain) = match (parts.next(), parts.next()) {
        (Some(l), Some(d)) => (l, d),
        _ => return false,
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::Contact;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn required_field() {
        let def = FieldDef::text("unit", "Unit").required();
        assert_eq!(check_field(&def, &text("   ")), Err("Unit is required".to_string()));
        assert!(check_field(&def, &text("Box")).is_ok());

        let tags = FieldDef::list("tags", "Tags").required();
        assert!(check_field(&tags, &FieldValue::List(vec![])).is_err());
    }

    #[test]
    fn phone_rule_checked_even_when_empty() {
        let def = FieldDef::tel("phoneNo", "Phone", Rule::Phone { message: "bad phone" });
        assert_eq!(check_field(&def, &text("")), Err("bad phone".to_string()));
        assert_eq!(check_field(&def, &text("12345")), Err("bad phone".to_string()));
        assert_eq!(check_field(&def, &text("12345abcde")), Err("bad phone".to_string()));
        assert!(check_field(&def, &text("0123456789")).is_ok());
    }

    #[test]
    fn mobile_rule_needs_leading_six_to_nine() {
        let def = FieldDef::tel("phoneNo", "Phone", Rule::Mobile { message: "bad mobile" });
        assert!(check_field(&def, &text("5123456789")).is_err());
        assert!(check_field(&def, &text("6123456789")).is_ok());
        assert!(check_field(&def, &text("9999999999")).is_ok());
        assert!(check_field(&def, &text("98765")).is_err());
    }

    #[test]
    fn kind_checks_skip_empty_values() {
        let number = FieldDef::number("commission", "Commission");
        assert!(check_field(&number, &text("")).is_ok());
        assert!(check_field(&number, &text("12.5")).is_ok());
        assert!(check_field(&number, &text("-3")).is_ok());
        assert_eq!(
            check_field(&number, &text("ten")),
            Err("Commission must be a number".to_string())
        );

        let date = FieldDef::date("openingDate", "Opening Date");
        assert!(check_field(&date, &text("2024-04-01")).is_ok());
        assert!(check_field(&date, &text("01/04/2024")).is_err());
        assert!(check_field(&date, &text("2024-02-30")).is_err());
    }

    #[test]
    fn email_and_select() {
        let email = FieldDef::email("email", "Email");
        assert!(check_field(&email, &text("a@b.in")).is_ok());
        assert!(check_field(&email, &text("a@")).is_err());
        assert!(check_field(&email, &text("a b@c")).is_err());
        assert!(check_field(&email, &text("nobody")).is_err());

        let select = FieldDef::select("openingType", "Opening Type", &["credit", "debit"]);
        assert!(check_field(&select, &text("credit")).is_ok());
        assert_eq!(
            check_field(&select, &text("loan")),
            Err("Opening Type must be one of: credit, debit".to_string())
        );
    }

    #[test]
    fn first_failure_in_declaration_order() {
        let mut draft = Draft::empty(Contact::FIELDS);
        draft.set("email", "broken").unwrap();

        let err = validate_draft(&draft).unwrap_err();
        assert_eq!(err.field_error(), Some(("name", "Name is required")));

        draft.set("name", "Alpha").unwrap();
        let err = validate_draft(&draft).unwrap_err();
        assert_eq!(err.field_error(), Some(("phone", "Phone must be 10 digits")));

        draft.set("phone", "9876543210").unwrap();
        let err = validate_draft(&draft).unwrap_err();
        assert_eq!(err.field_error().unwrap().0, "email");

        draft.set("email", "alpha@traders.in").unwrap();
        assert!(validate_draft(&draft).is_ok());
    }

    #[test]
    fn typed_record_validation() {
        let contact = Contact {
            name: "Alpha".into(),
            phone: "12345".into(),
            ..Default::default()
        };
        assert_eq!(
            validate_record(&contact),
            Err(ServiceError::Validation("Phone must be 10 digits".into()))
        );
    }
}
