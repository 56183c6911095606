// --- File: crates/termin_form/src/submission.rs ---
//! Sends finished bookings to the system of record.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use termin_common::{create_client, http::client::DEFAULT_TIMEOUT_SECS};
use termin_config::FormConfig;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::BookingRequest;

/// `type` of the message posted to the embedding page after a booking.
pub const PARENT_MESSAGE_TYPE: &str = "quizSubmission";

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("endpoint rejected the booking with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers a booking and returns the endpoint's response body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionClient: Send + Sync {
    async fn submit(&self, request: &BookingRequest) -> Result<Value, SubmissionError>;
}

/// Message for the page embedding the widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParentMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Value,
}

impl ParentMessage {
    pub fn quiz_submission(data: Value) -> Self {
        Self {
            kind: PARENT_MESSAGE_TYPE.to_string(),
            data,
        }
    }
}

/// Posts bookings as JSON to the configured endpoint, and optionally to the
/// spreadsheet relay route as well.
#[derive(Debug, Clone)]
pub struct HttpSubmissionClient {
    client: Client,
    endpoint_url: String,
    relay_url: Option<String>,
}

impl HttpSubmissionClient {
    pub fn new(client: Client, endpoint_url: impl Into<String>) -> Self {
        Self {
            client,
            endpoint_url: endpoint_url.into(),
            relay_url: None,
        }
    }

    pub fn with_relay(mut self, relay_url: impl Into<String>) -> Self {
        self.relay_url = Some(relay_url.into());
        self
    }

    pub fn from_config(config: &FormConfig) -> Result<Self, SubmissionError> {
        let client = create_client(DEFAULT_TIMEOUT_SECS, true)?;
        let mut this = Self::new(client, config.endpoint_url.clone());
        this.relay_url = config.relay_url.clone();
        Ok(this)
    }

    async fn forward_to_relay(&self, relay_url: &str, request: &BookingRequest) {
        match self.client.post(relay_url).json(request).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Booking forwarded to relay {}", relay_url);
            }
            Ok(response) => {
                warn!("Relay {} answered {}", relay_url, response.status());
            }
            Err(e) => warn!("Relay {} unreachable: {}", relay_url, e),
        }
    }
}

#[async_trait]
impl SubmissionClient for HttpSubmissionClient {
    async fn submit(&self, request: &BookingRequest) -> Result<Value, SubmissionError> {
        let response = self
            .client
            .post(&self.endpoint_url)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        info!("Booking for {} {} accepted", request.date, request.time);

        if let Some(relay_url) = &self.relay_url {
            self.forward_to_relay(relay_url, request).await;
        }

        // Non-JSON bodies are passed on as a plain string
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}
