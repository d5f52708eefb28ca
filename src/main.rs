//! Surveyor - Main Entry Point
//!
//! Command-line client for the Literature Surveyor answer service. Sends a
//! question, renders the Markdown and math answer to sanitized HTML, and
//! prints, exports, or copies it.

mod cli;
mod client;
mod config;
mod error;
mod export;
mod interactive;
mod markdown;
mod pipeline;
mod sanitize;
mod session;

use clap::Parser;
use log::{debug, info, warn};
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use cli::{read_payload, Cli};
use client::AnswerClient;
use config::{load_config, save_config, ConfigStore, Settings};
use error::{Error, Result, ResultExt};
use session::{Answer, Session};

/// Application name constant.
const APP_NAME: &str = "Surveyor";

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    debug!("Starting {}", APP_NAME);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            if let Some(detail) = err.detail() {
                eprintln!("  {}", detail);
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut settings = load_config();
    cli.apply_to(&mut settings);

    if cli.save_config {
        save_config(&settings)?;
    }

    let mut session = Session::new();

    if cli.interactive {
        let client = connect(&settings)?;
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        return interactive::run_loop(
            stdin.lock(),
            &mut stdout,
            &mut session,
            &settings.provider_label(),
            |question| client.ask(question, settings.use_local_llm, settings.provider),
        );
    }

    if let (Some(path), Some(question)) = (&cli.payload, cli.payload_question()) {
        info!("Rendering saved payload from {}", path.display());
        let ticket = session.begin(&question, "saved payload")?;
        session.finish(ticket, read_payload(path))?;
    } else {
        let question = cli.read_question()?;
        let client = connect(&settings)?;
        let ticket = session.begin(&question, settings.provider_label())?;
        let result = client.ask(&question, settings.use_local_llm, settings.provider);
        session.finish(ticket, result)?;
    }

    match session.answer() {
        Some(answer) => deliver(cli, &settings, answer),
        None => Err(Error::Response {
            message: session
                .error_message()
                .unwrap_or("no answer was received")
                .to_string(),
        }),
    }
}

fn connect(settings: &Settings) -> Result<AnswerClient> {
    let client = AnswerClient::new(
        &settings.api_url,
        Duration::from_secs(settings.request_timeout_secs),
    )?;
    debug!("Generation endpoint: {}", client.endpoint());
    Ok(client)
}

/// Print, export, open, and copy an answer as requested.
fn deliver(cli: &Cli, settings: &Settings, answer: &Answer) -> Result<()> {
    let output_path = match &cli.output {
        Some(path) => Some(path.clone()),
        None if cli.open => {
            let directory = settings
                .last_export_directory
                .clone()
                .unwrap_or_else(std::env::temp_dir);
            Some(export::default_export_path(
                &answer.question,
                Some(&directory),
            ))
        }
        None => None,
    };

    match &output_path {
        Some(path) => {
            export::export_to_file(answer, settings.theme, path)?;

            if cli.output.is_some() {
                if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                    remember_export_directory(dir)
                        .unwrap_or_warn_default((), "Failed to remember export directory");
                }
            }

            if cli.open || settings.open_after_export {
                export::open_exported(path)?;
            }
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", answer.html.trim_end())?;
        }
    }

    if cli.copy {
        if let Err(err) = export::copy_answer(answer) {
            warn!("Could not copy answer: {}", err);
            return Err(err);
        }
    }

    Ok(())
}

/// Store the export directory without persisting this run's overrides.
fn remember_export_directory(dir: &Path) -> Result<()> {
    let store = ConfigStore::open_default()?;
    if store.load()?.last_export_directory.as_deref() == Some(dir) {
        return Ok(());
    }
    store.update(|stored| stored.last_export_directory = Some(dir.to_path_buf()))
}
