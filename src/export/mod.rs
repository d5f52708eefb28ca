//! Answer Export Module for Surveyor
//!
//! This module turns a rendered answer into something that outlives the
//! session: a standalone themed HTML page or rich clipboard content.
//!
//! # Architecture
//!
//! - `html.rs` - Page generation with theme styling, file export
//! - `clipboard.rs` - Platform clipboard operations

pub mod clipboard;
pub mod html;

pub use clipboard::copy_answer;
pub use html::{default_export_path, export_to_file, open_exported};
