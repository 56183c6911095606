// --- File: crates/termin_sheets/src/routes.rs ---

use axum::{routing::post, Router};
use std::sync::Arc;
use termin_config::AppConfig;
use tracing::info;

use crate::client::{GoogleSheetsClient, SheetAppender};
use crate::handlers::{method_not_allowed_handler, submit_handler, SheetsState};

/// Creates the relay router backed by the Google Sheets API.
pub fn routes(config: Arc<AppConfig>) -> Router {
    let sheets_config = config.sheets.clone().unwrap_or_default();
    let appender: Arc<dyn SheetAppender> = Arc::new(GoogleSheetsClient::new(sheets_config));
    routes_with_appender(config, appender)
}

/// Creates the relay router with a custom appender.
pub fn routes_with_appender(config: Arc<AppConfig>, appender: Arc<dyn SheetAppender>) -> Router {
    info!("Sheets relay routes initialized");

    let state = Arc::new(SheetsState { config, appender });

    Router::new()
        .route(
            "/submit",
            post(submit_handler).fallback(method_not_allowed_handler),
        )
        .with_state(state)
}
