//! Error type shared by everything outside the rendering pipeline
//!
//! Settings I/O, the generation request and answer delivery all report
//! through [`Error`]. The pipeline stages never fail, they degrade, so none
//! of them appear here.
//!
//! Each error also maps to a process exit code for the command line.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Exit Codes
// ─────────────────────────────────────────────────────────────────────────────

/// Unspecified failure.
pub const EXIT_FAILURE: u8 = 1;
/// Bad input: blank question, unreadable or malformed input file.
pub const EXIT_INPUT: u8 = 2;
/// The generation service could not be reached or gave no usable answer.
pub const EXIT_SERVICE: u8 = 3;
/// The answer was received but could not be written, opened or copied.
pub const EXIT_DELIVERY: u8 = 4;

/// Shorthand for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Input / Output
    // ─────────────────────────────────────────────────────────────────────────
    /// Reading stdin or writing stdout failed
    Io(io::Error),

    /// A question or saved payload file could not be read
    FileRead { path: PathBuf, source: io::Error },

    /// An exported page could not be written
    FileWrite { path: PathBuf, source: io::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────
    /// No platform config directory (HOME unset, sandboxed, ...)
    ConfigDirNotFound,

    /// The settings file exists but could not be read
    ConfigRead { path: PathBuf, source: io::Error },

    /// The settings file is not valid JSON for [`crate::config::Settings`]
    ConfigParse {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },

    /// Writing the settings file (or its directory) failed
    ConfigWrite { path: PathBuf, source: io::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // Generation Service
    // ─────────────────────────────────────────────────────────────────────────
    /// Blank question; never sent
    EmptyQuestion,

    /// Connection, TLS or timeout failure
    Request(reqwest::Error),

    /// Non-success status; `message` is the service's own explanation
    Http { status: u16, message: String },

    /// Success status with a body that is not JSON
    Response { message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Delivery
    // ─────────────────────────────────────────────────────────────────────────
    Clipboard(String),
    Open { path: PathBuf, message: String },
}

impl Error {
    /// Exit code reported to the shell for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::EmptyQuestion | Error::FileRead { .. } | Error::ConfigParse { .. } => {
                EXIT_INPUT
            }
            Error::Request(_) | Error::Http { .. } | Error::Response { .. } => EXIT_SERVICE,
            Error::FileWrite { .. } | Error::Clipboard(_) | Error::Open { .. } => EXIT_DELIVERY,
            Error::Io(_)
            | Error::ConfigDirNotFound
            | Error::ConfigRead { .. }
            | Error::ConfigWrite { .. } => EXIT_FAILURE,
        }
    }

    /// The service's own explanation for a failed request, when it gave one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Error::Http { message, .. } if !message.trim().is_empty() => Some(message.trim()),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions
// ─────────────────────────────────────────────────────────────────────────────

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::ConfigParse { path: None, source }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Request(err)
    }
}

impl From<arboard::Error> for Error {
    fn from(err: arboard::Error) -> Self {
        Error::Clipboard(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display / std::error::Error
// ─────────────────────────────────────────────────────────────────────────────

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::FileRead { path, source } => {
                write!(f, "Cannot read '{}': {}", path.display(), source)
            }
            Error::FileWrite { path, source } => {
                write!(f, "Cannot write '{}': {}", path.display(), source)
            }

            Error::ConfigDirNotFound => write!(f, "No configuration directory available"),
            Error::ConfigRead { path, source } => {
                write!(f, "Cannot read settings '{}': {}", path.display(), source)
            }
            Error::ConfigParse {
                path: Some(path),
                source,
            } => write!(f, "Settings file '{}' is invalid: {}", path.display(), source),
            Error::ConfigParse { path: None, source } => {
                write!(f, "Settings are invalid: {}", source)
            }
            Error::ConfigWrite { path, source } => {
                write!(f, "Cannot save settings to '{}': {}", path.display(), source)
            }

            // The first three match what the web client showed its users
            Error::EmptyQuestion => write!(f, "Please enter a question"),
            Error::Request(err) => write!(
                f,
                "Failed to generate content. Please make sure the backend is running. ({})",
                err
            ),
            Error::Http { status, .. } => write!(f, "HTTP error! status: {}", status),
            Error::Response { message } => {
                write!(f, "The service returned an unreadable answer: {}", message)
            }

            Error::Clipboard(msg) => write!(f, "Clipboard error: {}", msg),
            Error::Open { path, message } => {
                write!(f, "Cannot open '{}': {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(source)
            | Error::FileRead { source, .. }
            | Error::FileWrite { source, .. }
            | Error::ConfigRead { source, .. }
            | Error::ConfigWrite { source, .. } => Some(source),
            Error::ConfigParse { source, .. } => Some(source),
            Error::Request(err) => Some(err),
            Error::ConfigDirNotFound
            | Error::EmptyQuestion
            | Error::Http { .. }
            | Error::Response { .. }
            | Error::Clipboard(_)
            | Error::Open { .. } => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Degrading Instead Of Failing
// ─────────────────────────────────────────────────────────────────────────────

/// Log-and-continue for results whose failure should not stop the program.
pub trait ResultExt<T> {
    /// The value, or `default` after a warning naming `context`.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        self.unwrap_or_else(|err| {
            warn!("{}: {}; continuing with defaults", context, err);
            default
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    fn not_found() -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, "missing")
    }

    #[test]
    fn test_io_conversion() {
        assert!(matches!(Error::from(not_found()), Error::Io(_)));
    }

    #[test]
    fn test_file_read_mentions_path() {
        let err = Error::FileRead {
            path: PathBuf::from("/tmp/payload.json"),
            source: not_found(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/payload.json"));
        assert!(msg.contains("missing"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_user_facing_service_messages() {
        let err = Error::Http {
            status: 500,
            message: "LLM returned no response".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error! status: 500");
        assert_eq!(Error::EmptyQuestion.to_string(), "Please enter a question");
    }

    #[test]
    fn test_http_detail_is_available() {
        let err = Error::Http {
            status: 500,
            message: " LLM returned no response ".to_string(),
        };
        assert_eq!(err.detail(), Some("LLM returned no response"));

        let bare = Error::Http {
            status: 502,
            message: String::new(),
        };
        assert_eq!(bare.detail(), None);
        assert_eq!(Error::EmptyQuestion.detail(), None);
    }

    #[test]
    fn test_json_conversion_is_config_parse() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err = Error::from(parse_err);
        assert!(matches!(err, Error::ConfigParse { path: None, .. }));
        assert!(err.to_string().starts_with("Settings are invalid"));
    }

    #[test]
    fn test_config_parse_with_path() {
        let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err = Error::ConfigParse {
            path: Some(PathBuf::from("/cfg/config.json")),
            source,
        };
        assert!(err.to_string().contains("/cfg/config.json"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::EmptyQuestion.exit_code(), EXIT_INPUT);
        assert_eq!(
            Error::Http {
                status: 502,
                message: String::new()
            }
            .exit_code(),
            EXIT_SERVICE
        );
        assert_eq!(Error::Clipboard("x".into()).exit_code(), EXIT_DELIVERY);
        assert_eq!(Error::ConfigDirNotFound.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_simple_variants_have_no_source() {
        assert!(Error::ConfigDirNotFound.source().is_none());
        assert!(Error::EmptyQuestion.source().is_none());
        assert!(Error::Response {
            message: "x".into()
        }
        .source()
        .is_none());
    }

    #[test]
    fn test_unwrap_or_warn_default() {
        let ok: Result<u32> = Ok(7);
        assert_eq!(ok.unwrap_or_warn_default(0, "ctx"), 7);

        let failed: Result<u32> = Err(Error::ConfigDirNotFound);
        assert_eq!(failed.unwrap_or_warn_default(3, "ctx"), 3);
    }
}
