use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use termin_common::TerminError;
use termin_config::{AppConfig, FormConfig, SlotsConfig};
use tower::ServiceExt;

fn app(use_form: bool, form: Option<FormConfig>) -> Router {
    termin_form::routes(Arc::new(AppConfig {
        use_form,
        form,
        ..AppConfig::default()
    }))
    .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn slots_for_a_thursday() {
    let (status, body) = send(app(true, None), get("/slots?date=2030-10-24")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["weekday"], "Thu");
    assert_eq!(
        body["slots"],
        json!(["09:00", "09:30", "16:00", "16:30", "18:00"])
    );
    assert_eq!(body["selectable"], true);
    assert_eq!(body["hint"], Value::Null);
}

#[tokio::test]
async fn weekend_has_no_slots_and_a_hint() {
    let (status, body) = send(app(true, None), get("/slots?date=2030-10-26")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slots"], json!([]));
    assert_eq!(body["hint"], "Keine Termine an diesem Tag verfügbar");
}

#[tokio::test]
async fn past_days_are_not_selectable() {
    let (_, body) = send(app(true, None), get("/slots?date=2020-01-06")).await;
    assert_eq!(body["selectable"], false);
    assert_eq!(body["slots"], json!(["09:30", "11:30", "13:30"]));
}

#[tokio::test]
async fn slot_overrides_from_config_are_served() {
    let form = FormConfig {
        slots: Some(SlotsConfig {
            sat: Some(vec!["10:00".to_string()]),
            ..SlotsConfig::default()
        }),
        ..FormConfig::default()
    };
    let (_, body) = send(app(true, Some(form)), get("/slots?date=2030-10-26")).await;
    assert_eq!(body["slots"], json!(["10:00"]));
}

#[test]
fn malformed_slot_override_fails_router_setup() {
    let form = FormConfig {
        slots: Some(SlotsConfig {
            mon: Some(vec!["9:30 Uhr".to_string()]),
            ..SlotsConfig::default()
        }),
        ..FormConfig::default()
    };
    let result = termin_form::routes(Arc::new(AppConfig {
        use_form: true,
        form: Some(form),
        ..AppConfig::default()
    }));
    match result {
        Err(TerminError::ConfigError(message)) => assert!(message.contains("9:30 Uhr")),
        Err(other) => panic!("expected a config error, got {other}"),
        Ok(_) => panic!("router built from malformed slots"),
    }
}

#[tokio::test]
async fn malformed_date_is_a_bad_request() {
    let (status, body) = send(app(true, None), get("/slots?date=24.10.2030")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 400);
}

#[tokio::test]
async fn disabled_form_answers_503() {
    let (status, _) = send(app(false, None), get("/slots?date=2030-10-24")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn validate_reports_every_missing_field() {
    let (status, body) = send(app(true, None), post_json("/validate", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    let errors = body["errors"].as_object().unwrap();
    assert_eq!(errors.len(), 6);
    assert_eq!(errors["email"], "Bitte geben Sie eine gültige E-Mail-Adresse ein");
}

#[tokio::test]
async fn validate_accepts_a_complete_booking() {
    let request = json!({
        "date": "2030-10-24",
        "time": "16:30",
        "name": "Erika Mustermann",
        "email": "Erika@Example.de",
        "phone": "+4915112345678",
        "message": "Rückruf bitte"
    });
    let (_, body) = send(app(true, None), post_json("/validate", request)).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["errors"], json!({}));
}

#[tokio::test]
async fn validate_rejects_a_slot_not_offered_that_day() {
    let request = json!({
        "date": "2030-10-24",
        "time": "10:00",
        "name": "Erika Mustermann",
        "email": "erika@example.de",
        "phone": "+4915112345678",
        "message": "Rückruf bitte"
    });
    let (_, body) = send(app(true, None), post_json("/validate", request)).await;
    assert_eq!(body["valid"], false);
    assert!(body["errors"].get("time").is_some());
}

#[tokio::test]
async fn validate_rejects_a_past_date() {
    let request = json!({
        "date": "2020-01-06",
        "time": "09:30",
        "name": "Erika Mustermann",
        "email": "erika@example.de",
        "phone": "+4915112345678",
        "message": "Rückruf bitte"
    });
    let (_, body) = send(app(true, None), post_json("/validate", request)).await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["errors"]["date"], "Bitte wählen Sie ein Datum");
    assert!(body["errors"].get("time").is_none());
}
