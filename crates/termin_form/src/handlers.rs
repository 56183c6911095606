// File: crates/termin_form/src/handlers.rs
//! HTTP handlers exposing the form's slot table and validator to embedders.

use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use termin_common::{service_unavailable, validation_error, TerminError};
use termin_config::AppConfig;
use tracing::{debug, info};

use crate::models::{Field, FieldErrors, FormFields};
use crate::slots::{self, SlotTable};
use crate::validation;

/// Shared state for the form routes.
#[derive(Clone)]
pub struct FormState {
    pub config: Arc<AppConfig>,
    pub slots: Arc<SlotTable>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct SlotsQuery {
    /// Day to list slots for, YYYY-MM-DD
    #[cfg_attr(feature = "openapi", param(example = "2026-10-22"))]
    pub date: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotsResponse {
    pub date: String,
    pub weekday: String,
    /// False for days before today
    pub selectable: bool,
    pub slots: Vec<String>,
    /// Hint shown instead of slot buttons when the day has none
    pub hint: Option<String>,
}

/// Form values to check. `date` uses YYYY-MM-DD.
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ValidateRequest {
    pub date: Option<String>,
    pub time: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: FieldErrors,
}

fn ensure_enabled(state: &FormState) -> Result<(), TerminError> {
    if state.config.use_form {
        Ok(())
    } else {
        Err(service_unavailable("Booking form service is disabled."))
    }
}

fn time_zone(state: &FormState) -> chrono_tz::Tz {
    slots::parse_time_zone(
        state
            .config
            .form
            .as_ref()
            .and_then(|form| form.time_zone.as_deref()),
    )
}

/// Lists the slots offered on a given day.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/slots",
    params(SlotsQuery),
    responses(
        (status = 200, description = "Slots offered on that day", body = SlotsResponse),
        (status = 400, description = "Invalid date format"),
        (status = 503, description = "Form service disabled")
    ),
    tag = "Form"
))]
pub async fn get_slots_handler(
    State(state): State<Arc<FormState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, TerminError> {
    ensure_enabled(&state)?;

    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| validation_error("Invalid date format (YYYY-MM-DD)"))?;
    let today = slots::today_in(time_zone(&state), Utc::now());
    let offered = state.slots.slots_for(date).to_vec();
    debug!("{} slot(s) offered on {}", offered.len(), date);

    Ok(Json(SlotsResponse {
        date: date.format("%Y-%m-%d").to_string(),
        weekday: date.weekday().to_string(),
        selectable: slots::is_selectable(date, today),
        hint: offered
            .is_empty()
            .then(|| crate::wizard::HINT_NO_SLOTS.to_string()),
        slots: offered,
    }))
}

/// Runs the form validator server-side and returns the error map.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/validate",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Validation result", body = ValidateResponse),
        (status = 503, description = "Form service disabled")
    ),
    tag = "Form"
))]
pub async fn validate_handler(
    State(state): State<Arc<FormState>>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, TerminError> {
    ensure_enabled(&state)?;

    let fields = FormFields {
        date: request
            .date
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()),
        time: request.time,
        name: request.name,
        email: request.email,
        phone: request.phone,
        message: request.message,
    };

    let mut errors = validation::validate(&fields);
    if let Some(date) = fields.date {
        let today = slots::today_in(time_zone(&state), Utc::now());
        if !slots::is_selectable(date, today) {
            errors.insert(Field::Date);
        }
    }
    if let (Some(date), Some(time)) = (fields.date, fields.time.as_deref()) {
        if !time.is_empty() && !state.slots.offers(date, time) {
            errors.insert(Field::Time);
        }
    }
    info!("Validated booking form, {} error(s)", errors.len());

    Ok(Json(ValidateResponse {
        valid: errors.is_empty(),
        errors,
    }))
}
