//! Blocking HTTP transport for the generation endpoint.

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::{GenerateRequest, Provider, GENERATE_PATH};
use crate::error::{Error, Result};

/// Error body the service sends with a non-success status.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Value,
}

/// Full URL of the generation endpoint for a service base URL.
pub fn generate_endpoint(api_url: &str) -> String {
    format!("{}{}", api_url.trim().trim_end_matches('/'), GENERATE_PATH)
}

/// Client for the generation service.
#[derive(Debug, Clone)]
pub struct AnswerClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl AnswerClient {
    /// Create a client for the service at `api_url`.
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: generate_endpoint(api_url),
        })
    }

    /// Endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Ask a question and return the raw answer payload.
    ///
    /// This is a blocking call. The question is trimmed first; an empty
    /// question never reaches the network.
    pub fn ask(&self, question: &str, use_local_llm: bool, provider: Provider) -> Result<Value> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::EmptyQuestion);
        }

        let request = GenerateRequest::new(question, use_local_llm, provider);
        info!(
            "Requesting answer from {} ({})",
            self.endpoint,
            super::provider_label(use_local_llm, provider)
        );

        let response = self.http.post(&self.endpoint).json(&request).send()?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            let message = match serde_json::from_str::<ErrorBody>(&error_text) {
                Ok(ErrorBody {
                    detail: Value::String(detail),
                }) => detail,
                Ok(ErrorBody { detail }) => detail.to_string(),
                Err(_) => error_text,
            };
            warn!("Service answered {}: {}", status.as_u16(), message);
            return Err(Error::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text()?;
        let payload = serde_json::from_str::<Value>(&body).map_err(|e| Error::Response {
            message: e.to_string(),
        })?;

        debug!("Received {} byte answer payload", body.len());
        Ok(payload)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
