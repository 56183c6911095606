// --- File: crates/termin_form/src/validation.rs ---
//! Field checks that gate progression through the form.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Field, FieldErrors, FormFields};

/// Country prefix the phone field always carries.
pub const PHONE_PREFIX: &str = "+49";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9][0-9]{1,14}$").expect("phone pattern compiles"));

/// Something, an `@`, and a domain with at least one dot. Case-insensitive.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(&email.to_lowercase())
}

/// Optional `+`, a non-zero leading digit, then 1 to 14 more ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Keeps the `+49` prefix in front of whatever the user typed.
///
/// A missing prefix is prepended (dropping one stray `+49` further in), and a
/// second `+49` after the prefix is removed once.
pub fn normalize_phone(input: &str) -> String {
    let value = if input.starts_with(PHONE_PREFIX) {
        input.to_string()
    } else {
        format!("{}{}", PHONE_PREFIX, input.replacen(PHONE_PREFIX, "", 1))
    };
    let rest = value[PHONE_PREFIX.len()..].replacen(PHONE_PREFIX, "", 1);
    format!("{}{}", PHONE_PREFIX, rest)
}

/// Whether a single field passes its required/format check.
pub fn is_field_valid(field: Field, fields: &FormFields) -> bool {
    match field {
        Field::Date => fields.date.is_some(),
        Field::Time => fields.time.as_deref().is_some_and(|t| !t.is_empty()),
        Field::Name => !fields.name.trim().is_empty(),
        Field::Email => is_valid_email(&fields.email),
        Field::Phone => is_valid_phone(&fields.phone),
        Field::Message => !fields.message.trim().is_empty(),
    }
}

/// Full check run before leaving the details step and again before sending.
pub fn validate(fields: &FormFields) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field in Field::ALL {
        if !is_field_valid(field, fields) {
            errors.insert(field);
        }
    }
    errors
}

/// On-blur check. Email and phone are re-checked; any other field just loses its error.
pub fn check_on_blur(errors: &mut FieldErrors, field: Field, fields: &FormFields) {
    match field {
        Field::Email | Field::Phone if !is_field_valid(field, fields) => errors.insert(field),
        _ => errors.remove(field),
    }
}
