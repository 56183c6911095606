//! Booking form for the Termin widget.
//!
//! A multi-step form collecting a date, a time slot and contact details:
//!
//! - [`slots`]: weekday-indexed slot table
//! - [`validation`]: required-field and email/phone format checks
//! - [`draft`]: local draft cache with a one-hour expiry
//! - [`submission`]: HTTP client posting the finished booking
//! - [`wizard`]: the details -> review -> done state machine
//!
//! The [`routes`] function exposes the slot table and validator over HTTP.

#[cfg(feature = "openapi")]
pub mod doc;
pub mod draft;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod slots;
pub mod submission;
pub mod toast;
pub mod validation;
pub mod wizard;

pub use models::{BookingRequest, Field, FieldErrors, FormFields};
pub use routes::routes;
pub use wizard::{BookingWizard, Step, WizardError};

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::FormApiDoc;
}
