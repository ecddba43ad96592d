use std::collections::HashMap;

use serde::Deserialize;

use crate::store::ContactFields;

pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_NUMBER_CHARS: usize = 15;

/// Incoming contact body. Every field is optional so that missing fields
/// can be reported per-field instead of failing deserialization outright.
#[derive(Debug, Default, Deserialize)]
pub struct ContactDraft {
    pub name: Option<String>,
    pub email_address: Option<String>,
    pub number: Option<String>,
}

/// Validate a draft into the store-facing field set.
///
/// On failure returns one message per offending field, keyed by field
/// name. Email uniqueness is NOT checked here; the store enforces it and
/// the conflict surfaces through the same field-error shape.
pub fn validate_draft(draft: ContactDraft) -> Result<ContactFields, HashMap<String, String>> {
    let mut errors = HashMap::new();

    let name = required_field(&mut errors, "name", draft.name);
    let email_address = required_field(&mut errors, "email_address", draft.email_address);
    let number = required_field(&mut errors, "number", draft.number);

    if let Some(name) = &name {
        if name.chars().count() > MAX_NAME_CHARS {
            errors.insert(
                "name".to_string(),
                format!("Must be at most {} characters", MAX_NAME_CHARS),
            );
        }
    }

    if let Some(number) = &number {
        if number.chars().count() > MAX_NUMBER_CHARS {
            errors.insert(
                "number".to_string(),
                format!("Must be at most {} characters", MAX_NUMBER_CHARS),
            );
        }
    }

    if let Some(email) = &email_address {
        if !is_valid_email(email) {
            errors.insert(
                "email_address".to_string(),
                "Enter a valid email address".to_string(),
            );
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // All three are Some once errors is empty
    Ok(ContactFields {
        name: name.unwrap_or_default(),
        email_address: email_address.unwrap_or_default(),
        number: number.unwrap_or_default(),
    })
}

fn required_field(
    errors: &mut HashMap<String, String>,
    field: &str,
    value: Option<String>,
) -> Option<String> {
    match value {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            errors.insert(field.to_string(), "This field is required".to_string());
            None
        }
    }
}

/// Syntactic email check: exactly one '@', non-empty local part, and a
/// domain containing a '.' that is not at either edge.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = match parts.next() {
        Some(d) => d,
        None => return false,
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, email: &str, number: &str) -> ContactDraft {
        ContactDraft {
            name: Some(name.to_string()),
            email_address: Some(email.to_string()),
            number: Some(number.to_string()),
        }
    }

    #[test]
    fn valid_draft_passes() {
        let fields = validate_draft(draft("Test User", "test@plivo.com", "332253533")).unwrap();
        assert_eq!(fields.name, "Test User");
        assert_eq!(fields.email_address, "test@plivo.com");
        assert_eq!(fields.number, "332253533");
    }

    #[test]
    fn missing_fields_are_each_reported() {
        let errors = validate_draft(ContactDraft::default()).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("email_address"));
        assert!(errors.contains_key("number"));
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let errors = validate_draft(draft("", "test@plivo.com", "123")).unwrap_err();
        assert_eq!(errors.get("name").unwrap(), "This field is required");
    }

    #[test]
    fn overlong_name_rejected() {
        let long = "x".repeat(MAX_NAME_CHARS + 1);
        let errors = validate_draft(draft(&long, "test@plivo.com", "123")).unwrap_err();
        assert!(errors.contains_key("name"));
    }

    #[test]
    fn name_at_limit_accepted() {
        let exact = "x".repeat(MAX_NAME_CHARS);
        assert!(validate_draft(draft(&exact, "test@plivo.com", "123")).is_ok());
    }

    #[test]
    fn overlong_number_rejected() {
        let errors =
            validate_draft(draft("Test", "test@plivo.com", "1234567890123456")).unwrap_err();
        assert!(errors.contains_key("number"));
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("test@plivo.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("plain"));
        assert!(!is_valid_email("@plivo.com"));
        assert!(!is_valid_email("test@plivo"));
        assert!(!is_valid_email("test@.com"));
        assert!(!is_valid_email("test@plivo.com."));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn bad_email_reported_on_its_field() {
        let errors = validate_draft(draft("Test", "not-an-email", "123")).unwrap_err();
        assert_eq!(
            errors.get("email_address").unwrap(),
            "Enter a valid email address"
        );
    }
}
