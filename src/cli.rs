//! Command-line interface definition.

use clap::Parser;
use std::io::{self, Read};
use std::path::PathBuf;

use crate::client::Provider;
use crate::config::{Settings, Theme, API_URL_ENV};
use crate::error::{Error, Result};

#[derive(Debug, Parser)]
#[command(name = "surveyor")]
#[command(about = "Ask the Literature Surveyor service a question and render the answer")]
#[command(version)]
#[command(after_help = "\
Examples:
  surveyor 'What is the Navier-Stokes existence problem?'
  echo 'Explain \\(e^{i\\pi}+1=0\\)' | surveyor --local
  surveyor --provider mistral --output answer.html --open 'Why is the sky blue?'
  surveyor --payload saved.json --output answer.html
  surveyor --interactive --local")]
pub struct Cli {
    /// Question to ask (read from stdin when omitted)
    pub question: Option<String>,

    /// Ask questions one per line until `:quit`
    #[arg(long, short = 'i', conflicts_with_all = ["question", "payload", "output", "open", "copy"])]
    pub interactive: bool,

    /// Use the service's local model instead of a cloud provider
    #[arg(long)]
    pub local: bool,

    /// Cloud provider to use
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// Base URL of the generation service
    #[arg(long, env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Theme for the exported page
    #[arg(long, value_enum)]
    pub theme: Option<Theme>,

    /// Render a saved JSON response instead of sending a request
    #[arg(long, value_name = "FILE")]
    pub payload: Option<PathBuf>,

    /// Write a standalone HTML page instead of printing the fragment
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Open the exported page in the default browser
    #[arg(long)]
    pub open: bool,

    /// Copy the rendered answer to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Persist the service options given on this command line
    #[arg(long)]
    pub save_config: bool,
}

impl Cli {
    /// Override settings with the options given for this run.
    pub fn apply_to(&self, settings: &mut Settings) {
        if self.local {
            settings.use_local_llm = true;
        } else if self.provider.is_some() {
            settings.use_local_llm = false;
        }
        if let Some(provider) = self.provider {
            settings.provider = provider;
        }
        if let Some(api_url) = &self.api_url {
            settings.api_url = api_url.clone();
        }
        if let Some(timeout) = self.timeout {
            settings.request_timeout_secs = timeout;
        }
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        settings.sanitize();
    }

    /// The question from the command line, or all of stdin.
    pub fn read_question(&self) -> Result<String> {
        match &self.question {
            Some(question) => Ok(question.clone()),
            None => {
                let mut question = String::new();
                io::stdin().read_to_string(&mut question)?;
                Ok(question)
            }
        }
    }

    /// Label used for a payload loaded from disk.
    pub fn payload_question(&self) -> Option<String> {
        let path = self.payload.as_ref()?;
        Some(
            self.question
                .clone()
                .unwrap_or_else(|| path.display().to_string()),
        )
    }
}

/// Read and parse a saved response payload.
pub fn read_payload(path: &std::path::Path) -> Result<serde_json::Value> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|e| Error::Response {
        message: format!("{}: {}", path.display(), e),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
