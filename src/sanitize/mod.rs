//! HTML sanitization for rendered answers
//!
//! Answer text comes from a language model and may contain markup placed
//! there by a prompt injection. Everything the renderer produces goes through
//! an ammonia [`Builder`] built from the default profile plus the MathML
//! table in [`allow_list`]. Elements not on the list are removed (their text
//! content is kept, except for `script` and `style` whose content is dropped
//! too), attributes not on the list are removed, and URL attributes keep only
//! ammonia's default schemes.

pub mod allow_list;

use ammonia::Builder;
use log::{debug, warn};
use std::sync::OnceLock;

use allow_list::{validate_allow_list, MATH_ALLOW_LIST};

/// Global sanitizer instance (built once, reused)
static SANITIZER: OnceLock<Builder<'static>> = OnceLock::new();

/// Get the shared sanitizer.
fn sanitizer() -> &'static Builder<'static> {
    SANITIZER.get_or_init(build_sanitizer)
}

/// Build the sanitizer from ammonia's defaults and the math allow-list.
///
/// If the allow-list fails validation it is not applied at all; math then
/// degrades to its text content.
fn build_sanitizer() -> Builder<'static> {
    let mut builder = Builder::default();

    match validate_allow_list(MATH_ALLOW_LIST) {
        Ok(()) => {
            builder.add_tags(MATH_ALLOW_LIST.iter().map(|(tag, _)| *tag));
            for &(tag, attributes) in MATH_ALLOW_LIST {
                builder.add_tag_attributes(tag, attributes.iter().copied());
            }
            debug!(
                "Sanitizer built with {} MathML element(s)",
                MATH_ALLOW_LIST.len()
            );
        }
        Err(violation) => {
            warn!("MathML allow-list rejected, using default profile: {}", violation);
        }
    }

    builder
}

/// Strip everything not on the allow-list from an HTML fragment.
///
/// The result can be inserted into a page without further escaping.
pub fn sanitize_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    sanitizer().clean(html).to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
