//! Upstream generation service client
//!
//! One request shape, one endpoint. The service answers with a loosely
//! typed JSON payload which is handed to the rendering pipeline as-is.

mod http;

pub use http::AnswerClient;

use serde::{Deserialize, Serialize};

/// Path of the generation endpoint, relative to the service base URL.
pub const GENERATE_PATH: &str = "/LS/content/v1/generate";

// ─────────────────────────────────────────────────────────────────────────────
// Provider
// ─────────────────────────────────────────────────────────────────────────────

/// Cloud model provider the service should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    Mistral,
}

impl Provider {
    /// Wire name, as sent in the request body.
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Mistral => "mistral",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Describe where an answer comes from: `local` or `cloud (<provider>)`.
pub fn provider_label(use_local_llm: bool, provider: Provider) -> String {
    if use_local_llm {
        "local".to_string()
    } else {
        format!("cloud ({})", provider.name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request Body
// ─────────────────────────────────────────────────────────────────────────────

/// JSON body of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub question: String,
    pub local_llm: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
}

impl GenerateRequest {
    /// Build a request; the provider is only sent for cloud requests.
    pub fn new(question: impl Into<String>, use_local_llm: bool, provider: Provider) -> Self {
        Self {
            question: question.into(),
            local_llm: use_local_llm,
            provider: (!use_local_llm).then_some(provider),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_serialization() {
        assert_eq!(serde_json::to_string(&Provider::Gemini).unwrap(), "\"gemini\"");
        assert_eq!(
            serde_json::from_str::<Provider>("\"mistral\"").unwrap(),
            Provider::Mistral
        );
        assert!(serde_json::from_str::<Provider>("\"Gemini\"").is_err());
    }

    #[test]
    fn test_provider_default_and_display() {
        assert_eq!(Provider::default(), Provider::Gemini);
        assert_eq!(Provider::Mistral.to_string(), "mistral");
    }

    #[test]
    fn test_provider_label() {
        assert_eq!(provider_label(true, Provider::Mistral), "local");
        assert_eq!(provider_label(false, Provider::Gemini), "cloud (gemini)");
        assert_eq!(provider_label(false, Provider::Mistral), "cloud (mistral)");
    }

    #[test]
    fn test_cloud_request_body() {
        let request = GenerateRequest::new("What is entropy?", false, Provider::Gemini);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "question": "What is entropy?", "local_llm": false, "provider": "gemini" })
        );
    }

    #[test]
    fn test_local_request_omits_provider() {
        let request = GenerateRequest::new("What is entropy?", true, Provider::Mistral);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "question": "What is entropy?", "local_llm": true })
        );
    }
}
