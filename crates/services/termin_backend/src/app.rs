// File: services/termin_backend/src/app.rs
use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use termin_common::TerminError;
use termin_config::AppConfig;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[axum::debug_handler]
async fn health(State(config): State<Arc<AppConfig>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "form": config.use_form,
        "sheets": config.use_sheets,
    }))
}

/// Assembles the `/api` router from the enabled services.
///
/// Fails when an enabled service rejects its configuration.
pub fn build_app(config: Arc<AppConfig>) -> Result<Router, TerminError> {
    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Termin API!" }))
        .route("/health", get(health))
        .with_state(config.clone());

    let api_router = Router::new().nest("/api", {
        #[allow(unused_mut)] // mutated only with service features on
        let mut router = api_router;
        #[cfg(feature = "form")]
        if config.use_form {
            info!("Mounting booking form routes");
            router = router.merge(termin_form::routes(config.clone())?);
        }
        #[cfg(feature = "sheets")]
        if config.use_sheets {
            info!("Mounting spreadsheet relay routes");
            router = router.merge(termin_sheets::routes(config.clone()));
        }
        router
    });

    #[allow(unused_mut)]
    let mut app = api_router;

    #[cfg(feature = "openapi")]
    {
        use termin_form::doc::FormApiDoc;
        #[cfg(feature = "sheets")]
        use termin_sheets::doc::SheetsApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Termin API",
                version = "0.1.0",
                description = "Appointment booking widget backend",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Termin", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(FormApiDoc::openapi());
        #[cfg(feature = "sheets")]
        openapi_doc.merge(SheetsApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    // The widget is embedded cross-origin.
    Ok(app
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http()))
}
