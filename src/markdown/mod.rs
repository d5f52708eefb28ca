//! Markdown and math rendering
//!
//! This module turns answer text into HTML using the comrak library, a
//! CommonMark + GFM compatible parser, and typesets `$`/`$$` math with KaTeX.
//!
//! # Features
//! - GitHub Flavored Markdown tables, strikethrough and autolinks
//! - Single newlines rendered as line breaks
//! - Math rendered to MathML, with per-expression fallback to source text
//!
//! The HTML produced here contains whatever raw markup the text carried and
//! must go through [`crate::sanitize`] before it is displayed.
//!
//! # Example
//! ```ignore
//! use crate::markdown::render_markdown;
//!
//! let html = render_markdown("Energy: $E=mc^2$");
//! ```

pub mod math;
mod render;

pub use render::render_markdown;
