// --- File: crates/termin_form/src/toast.rs ---
//! Short-lived status banner shown above the form.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Seconds a toast stays visible.
pub const TOAST_LIFETIME_SECS: i64 = 3;

pub const MSG_FIX_FIELDS: &str = "Bitte füllen Sie alle Felder korrekt aus";
pub const MSG_PROCESSING: &str = "Buchung wird verarbeitet...";
pub const MSG_BOOKED: &str = "Termin erfolgreich gebucht!";
pub const MSG_BOOKING_FAILED: &str = "Fehler beim Buchen des Termins";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at: now,
        }
    }

    pub fn success(message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::new(ToastKind::Success, message, now)
    }

    pub fn error(message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::new(ToastKind::Error, message, now)
    }

    pub fn info(message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::new(ToastKind::Info, message, now)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= Duration::seconds(TOAST_LIFETIME_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn expires_after_three_seconds() {
        let shown = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let toast = Toast::error(MSG_FIX_FIELDS, shown);
        assert!(!toast.is_expired(shown + Duration::milliseconds(2999)));
        assert!(toast.is_expired(shown + Duration::seconds(3)));
    }
}
