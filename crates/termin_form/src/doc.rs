// --- File: crates/termin_form/src/doc.rs ---
#![cfg(feature = "openapi")]

use utoipa::OpenApi;

use crate::handlers::{SlotsResponse, ValidateRequest, ValidateResponse};
use crate::models::{BookingRequest, Field, FieldErrors};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_slots_handler,
        crate::handlers::validate_handler,
    ),
    components(
        schemas(
            SlotsResponse,
            ValidateRequest,
            ValidateResponse,
            BookingRequest,
            Field,
            FieldErrors
        )
    ),
    tags(
        (name = "Form", description = "Booking form slot table and validation")
    )
)]
pub struct FormApiDoc;
