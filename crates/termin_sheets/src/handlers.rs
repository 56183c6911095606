//! Relay handler: one booking in, one spreadsheet row out.

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use termin_common::service_unavailable;
use termin_config::AppConfig;
use termin_form::BookingRequest;
use tracing::{error, info};

use crate::client::SheetAppender;

pub const MSG_BOOKED: &str = "Termin erfolgreich gebucht!";
pub const MSG_BOOKING_FAILED: &str = "Fehler beim Buchen des Termins";

#[derive(Clone)]
pub struct SheetsState {
    pub config: Arc<AppConfig>,
    pub appender: Arc<dyn SheetAppender>,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubmitResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubmitErrorResponse {
    pub error: String,
}

fn booking_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(SubmitErrorResponse {
            error: MSG_BOOKING_FAILED.to_string(),
        }),
    )
        .into_response()
}

/// Appends the posted booking to the spreadsheet.
///
/// Every failure, an unreadable body included, answers 500 with the same
/// fixed message; details only go to the log.
#[axum::debug_handler]
pub async fn submit_handler(
    State(state): State<Arc<SheetsState>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Response {
    if !state.config.use_sheets {
        return service_unavailable("Spreadsheet relay is disabled.").into_response();
    }

    let Json(booking) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            error!("Rejected booking payload: {}", rejection.body_text());
            return booking_failed();
        }
    };

    match state.appender.append_row(booking.to_row()).await {
        Ok(()) => {
            info!("Booking for {} at {} appended to sheet", booking.date, booking.time);
            (
                StatusCode::OK,
                Json(SubmitResponse {
                    message: MSG_BOOKED.to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Error appending booking to sheet: {}", e);
            booking_failed()
        }
    }
}

/// Answers any method other than POST on the relay route.
pub async fn method_not_allowed_handler(method: Method) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        format!("Method {} Not Allowed", method),
    )
        .into_response()
}
