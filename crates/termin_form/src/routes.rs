// --- File: crates/termin_form/src/routes.rs ---

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use termin_common::TerminError;
use termin_config::AppConfig;
use tracing::info;

use crate::handlers::{get_slots_handler, validate_handler, FormState};
use crate::slots::SlotTable;

/// Creates a router containing the booking form routes.
///
/// Fails with a configuration error when a `form.slots` label is not `HH:MM`.
pub fn routes(config: Arc<AppConfig>) -> Result<Router, TerminError> {
    let slot_config = config.form.as_ref().and_then(|form| form.slots.as_ref());
    let slots = SlotTable::from_config(slot_config)?;

    info!("Form routes initialized");

    let state = Arc::new(FormState {
        config,
        slots: Arc::new(slots),
    });

    Ok(Router::new()
        .route("/slots", get(get_slots_handler))
        .route("/validate", post(validate_handler))
        .with_state(state))
}
