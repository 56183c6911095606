//! Spreadsheet relay for Termin bookings.
//!
//! Exposes `POST /submit`, which appends the posted booking as one row
//! `[date, time, name, email, phone, message]` to a Google spreadsheet using
//! service-account credentials.

pub mod auth;
pub mod client;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod routes;

pub use client::{GoogleSheetsClient, SheetAppender, SheetsError};
pub use routes::{routes, routes_with_appender};

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::SheetsApiDoc;
}
