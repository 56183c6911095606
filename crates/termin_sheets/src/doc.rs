#![allow(dead_code)]
use utoipa::OpenApi;

use crate::handlers::{SubmitErrorResponse, SubmitResponse};
use termin_form::BookingRequest;

#[utoipa::path(
    post,
    path = "/submit",
    request_body(content = BookingRequest, example = json!({
        "date": "October 20th, 2026",
        "time": "14:00",
        "name": "Erika Mustermann",
        "email": "erika@example.de",
        "phone": "+4915112345678",
        "message": "Erstgespräch"
    })),
    responses(
        (status = 200, description = "Row appended", body = SubmitResponse,
         example = json!({ "message": "Termin erfolgreich gebucht!" })),
        (status = 405, description = "Any method other than POST"),
        (status = 500, description = "Append failed", body = SubmitErrorResponse,
         example = json!({ "error": "Fehler beim Buchen des Termins" })),
        (status = 503, description = "Relay disabled")
    ),
    tag = "Sheets"
)]
fn doc_submit_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_submit_handler),
    components(schemas(BookingRequest, SubmitResponse, SubmitErrorResponse)),
    tags(
        (name = "Sheets", description = "Relay appending bookings to a spreadsheet")
    )
)]
pub struct SheetsApiDoc;
