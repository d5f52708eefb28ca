//! User settings for Surveyor
//!
//! Everything the command line can remember between runs: where the
//! service lives, which model to ask, and how exported pages look.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::client::Provider;

/// Environment variable that overrides the configured service URL.
pub const API_URL_ENV: &str = "SURVEYOR_API_URL";

/// Service URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8001";

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Color theme for exported answer pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Get a display label for the theme.
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Stored preferences.
///
/// Unknown keys are ignored and missing keys take their default, so files
/// written by older or newer builds still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Service
    // ─────────────────────────────────────────────────────────────────────────
    /// Base URL of the generation service
    pub api_url: String,

    /// Ask the service to use its local model instead of a cloud provider
    pub use_local_llm: bool,

    /// Cloud provider used when `use_local_llm` is off
    pub provider: Provider,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // Export Settings
    // ─────────────────────────────────────────────────────────────────────────
    /// Theme for exported answer pages
    pub theme: Theme,

    /// Open every exported page, not only with `--open`
    pub open_after_export: bool,

    /// Where `--output` last wrote a page; reused by `--open`
    pub last_export_directory: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Service
            api_url: DEFAULT_API_URL.to_string(),
            use_local_llm: false,
            provider: Provider::default(),
            request_timeout_secs: 120,

            // Export Settings
            theme: Theme::default(),
            open_after_export: false,
            last_export_directory: None,
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Limits
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum allowed request timeout.
    pub const MIN_TIMEOUT_SECS: u64 = 5;
    /// Maximum allowed request timeout.
    pub const MAX_TIMEOUT_SECS: u64 = 600;

    /// Bring hand-edited values back into range.
    ///
    /// The timeout is clamped and the service URL loses surrounding
    /// whitespace and trailing slashes.
    pub fn sanitize(&mut self) {
        self.request_timeout_secs = self
            .request_timeout_secs
            .clamp(Self::MIN_TIMEOUT_SECS, Self::MAX_TIMEOUT_SECS);

        // A blank URL would produce a relative request path
        let trimmed = self.api_url.trim().trim_end_matches('/');
        self.api_url = if trimmed.is_empty() {
            DEFAULT_API_URL.to_string()
        } else {
            trimmed.to_string()
        };
    }

    /// Parse JSON, then [`Settings::sanitize`].
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Apply an environment override for the service URL.
    ///
    /// Blank values are ignored.
    pub fn apply_api_url_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|url| !url.trim().is_empty()) {
            self.api_url = url;
            self.sanitize();
        }
    }

    /// Human-readable provider description, e.g. `cloud (gemini)`.
    pub fn provider_label(&self) -> String {
        crate::client::provider_label(self.use_local_llm, self.provider)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_local_service() {
        let settings = Settings::default();

        assert_eq!(settings.api_url, "http://localhost:8001");
        assert!(!settings.use_local_llm);
        assert_eq!(settings.provider, Provider::Gemini);
        assert_eq!(settings.request_timeout_secs, 120);
        assert_eq!(settings.theme, Theme::Light);
        assert!(!settings.open_after_export);
    }

    #[test]
    fn test_theme_names_are_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    }

    #[test]
    fn test_unknown_theme_is_rejected() {
        assert_eq!(serde_json::from_str::<Theme>("\"dark\"").unwrap(), Theme::Dark);
        assert!(serde_json::from_str::<Theme>("\"system\"").is_err());
    }

    #[test]
    fn test_sanitize_clamps_timeout() {
        let mut settings = Settings {
            request_timeout_secs: 1,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.request_timeout_secs, Settings::MIN_TIMEOUT_SECS);

        settings.request_timeout_secs = 10_000;
        settings.sanitize();
        assert_eq!(settings.request_timeout_secs, Settings::MAX_TIMEOUT_SECS);
    }

    #[test]
    fn test_sanitize_normalizes_api_url() {
        let mut settings = Settings {
            api_url: "  https://surveyor.example/  ".to_string(),
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.api_url, "https://surveyor.example");

        settings.api_url = "   ".to_string();
        settings.sanitize();
        assert_eq!(settings.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_from_json_sanitized_partial() {
        let settings =
            Settings::from_json_sanitized(r#"{"provider": "mistral", "request_timeout_secs": 0}"#)
                .unwrap();
        assert_eq!(settings.provider, Provider::Mistral);
        assert_eq!(settings.request_timeout_secs, Settings::MIN_TIMEOUT_SECS);
        assert_eq!(settings.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_api_url_override() {
        let mut settings = Settings::default();
        settings.apply_api_url_override(Some("http://10.0.0.2:9000/".to_string()));
        assert_eq!(settings.api_url, "http://10.0.0.2:9000");

        settings.apply_api_url_override(Some("  ".to_string()));
        assert_eq!(settings.api_url, "http://10.0.0.2:9000");

        settings.apply_api_url_override(None);
        assert_eq!(settings.api_url, "http://10.0.0.2:9000");
    }

    #[test]
    fn test_provider_label() {
        let mut settings = Settings::default();
        assert_eq!(settings.provider_label(), "cloud (gemini)");

        settings.use_local_llm = true;
        assert_eq!(settings.provider_label(), "local");
    }

    #[test]
    fn test_json_keeps_every_field() {
        let settings = Settings {
            api_url: "https://surveyor.example".to_string(),
            use_local_llm: true,
            provider: Provider::Mistral,
            theme: Theme::Dark,
            ..Settings::default()
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, loaded);
    }
}
