// --- File: crates/termin_form/src/models.rs ---
//! Data carried by the booking form.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A form field that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Date,
    Time,
    Name,
    Email,
    Phone,
    Message,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Date,
        Field::Time,
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::Message,
    ];

    /// Key used for this field in error maps and JSON bodies.
    pub fn key(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Time => "time",
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Message => "message",
        }
    }

    /// Inline message shown below the field when it fails validation.
    pub fn error_message(self) -> &'static str {
        match self {
            Field::Date => "Bitte wählen Sie ein Datum",
            Field::Time => "Bitte wählen Sie eine Uhrzeit",
            Field::Name => "Bitte geben Sie Ihren Namen ein",
            Field::Email => "Bitte geben Sie eine gültige E-Mail-Adresse ein",
            Field::Phone => "Bitte geben Sie eine gültige Telefonnummer ein",
            Field::Message => "Bitte geben Sie eine Nachricht ein",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| format!("unknown form field: {s}"))
    }
}

/// Field key -> inline error message. Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `field` as invalid with its standard message.
    pub fn insert(&mut self, field: Field) {
        self.0.insert(field, field.error_message().to_string());
    }

    pub fn remove(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Values as the user is typing them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// The finished booking as it goes over the wire.
///
/// Missing fields deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct BookingRequest {
    /// Long form date, e.g. "October 19th, 2026"
    pub date: String,
    /// Slot label, e.g. "09:30"
    pub time: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl BookingRequest {
    /// Builds the wire record from form values. Missing date or time become empty strings.
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            date: fields.date.map(format_long_date).unwrap_or_default(),
            time: fields.time.clone().unwrap_or_default(),
            name: fields.name.clone(),
            email: fields.email.clone(),
            phone: fields.phone.clone(),
            message: fields.message.clone(),
        }
    }

    /// Spreadsheet row in column order date, time, name, email, phone, message.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.time.clone(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.message.clone(),
        ]
    }
}

/// Formats a date as "October 19th, 2026".
pub fn format_long_date(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{} {}{}, {}", date.format("%B"), day, suffix, date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_date_uses_ordinal_suffixes() {
        let d = |day| NaiveDate::from_ymd_opt(2026, 10, day).unwrap();
        assert_eq!(format_long_date(d(1)), "October 1st, 2026");
        assert_eq!(format_long_date(d(2)), "October 2nd, 2026");
        assert_eq!(format_long_date(d(3)), "October 3rd, 2026");
        assert_eq!(format_long_date(d(11)), "October 11th, 2026");
        assert_eq!(format_long_date(d(13)), "October 13th, 2026");
        assert_eq!(format_long_date(d(22)), "October 22nd, 2026");
        assert_eq!(format_long_date(d(31)), "October 31st, 2026");
    }

    #[test]
    fn partial_booking_body_defaults_to_empty_strings() {
        let booking: BookingRequest =
            serde_json::from_str(r#"{"name":"Max","date":"October 20th, 2026"}"#).unwrap();
        assert_eq!(booking.name, "Max");
        assert_eq!(booking.email, "");
        assert_eq!(
            booking.to_row(),
            vec!["October 20th, 2026", "", "Max", "", "", ""]
        );
    }

    #[test]
    fn field_errors_serialize_by_key() {
        let mut errors = FieldErrors::new();
        errors.insert(Field::Email);
        errors.insert(Field::Date);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "date": "Bitte wählen Sie ein Datum",
                "email": "Bitte geben Sie eine gültige E-Mail-Adresse ein",
            })
        );
    }

    #[test]
    fn field_parses_from_key() {
        assert_eq!("phone".parse::<Field>(), Ok(Field::Phone));
        assert!("zip".parse::<Field>().is_err());
    }
}
