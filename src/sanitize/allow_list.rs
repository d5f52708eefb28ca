//! MathML allow-list for the HTML sanitizer
//!
//! The sanitizer starts from ammonia's default HTML profile and adds only
//! what is declared here: MathML presentation elements, each with the
//! attributes it may keep. The table is checked by [`validate_allow_list`]
//! before it is applied, so an entry that would reopen a script context
//! cannot reach the sanitizer.

use std::fmt;

/// An element name paired with the attributes it may carry.
pub type AllowEntry = (&'static str, &'static [&'static str]);

/// Styling attributes shared by every MathML element.
const PRESENTATION: &[&str] = &["mathvariant", "mathsize", "mathcolor", "mathbackground"];

/// `display="block"` marks display math on the root.
const MATH_ROOT: &[&str] = &[
    "display",
    "mathvariant",
    "mathsize",
    "mathcolor",
    "mathbackground",
];

/// `notation` picks the enclosure drawn by `\cancel`, `\boxed` and friends.
const ENCLOSURE: &[&str] = &[
    "notation",
    "mathvariant",
    "mathsize",
    "mathcolor",
    "mathbackground",
];

/// Attributes of the TeX source annotation.
const ANNOTATION: &[&str] = &["encoding"];

/// MathML elements added to the sanitizer, with their allowed attributes.
pub const MATH_ALLOW_LIST: &[AllowEntry] = &[
    // Root and source annotation
    ("math", MATH_ROOT),
    ("semantics", PRESENTATION),
    ("annotation", ANNOTATION),
    // Grouping and tokens
    ("mrow", PRESENTATION),
    ("mi", PRESENTATION),
    ("mn", PRESENTATION),
    ("mo", PRESENTATION),
    ("mtext", PRESENTATION),
    ("mspace", PRESENTATION),
    ("mstyle", PRESENTATION),
    ("mpadded", PRESENTATION),
    ("mphantom", PRESENTATION),
    ("mfenced", PRESENTATION),
    // Scripts and layout
    ("msup", PRESENTATION),
    ("msub", PRESENTATION),
    ("msubsup", PRESENTATION),
    ("mfrac", PRESENTATION),
    ("msqrt", PRESENTATION),
    ("mroot", PRESENTATION),
    ("mover", PRESENTATION),
    ("munder", PRESENTATION),
    ("munderover", PRESENTATION),
    ("menclose", ENCLOSURE),
    // Tables
    ("mtable", PRESENTATION),
    ("mtr", PRESENTATION),
    ("mtd", PRESENTATION),
    ("mlabeledtr", PRESENTATION),
];

/// Elements that execute code, embed documents, submit data, or switch the
/// parser into another content model.
const FORBIDDEN_ELEMENTS: &[&str] = &[
    "script",
    "style",
    "iframe",
    "frame",
    "frameset",
    "object",
    "embed",
    "applet",
    "form",
    "input",
    "button",
    "textarea",
    "select",
    "link",
    "meta",
    "base",
    "svg",
    "template",
    "noscript",
    "maction",
    "annotation-xml",
];

/// Attributes that carry URLs or styles.
const FORBIDDEN_ATTRIBUTES: &[&str] = &[
    "href",
    "src",
    "srcdoc",
    "xlink:href",
    "action",
    "formaction",
    "style",
    "definitionurl",
];

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

/// An allow-list entry that would weaken the sanitizer's default denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowListViolation {
    /// The element itself is never allowed
    Element(String),
    /// The attribute is never allowed, on any element
    Attribute { element: String, attribute: String },
}

impl fmt::Display for AllowListViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllowListViolation::Element(element) => {
                write!(f, "element <{}> may not be allow-listed", element)
            }
            AllowListViolation::Attribute { element, attribute } => write!(
                f,
                "attribute '{}' on <{}> may not be allow-listed",
                attribute, element
            ),
        }
    }
}

impl std::error::Error for AllowListViolation {}

/// Check that no entry names a forbidden element or attribute.
///
/// Event handlers (`on*`) are rejected regardless of spelling.
pub fn validate_allow_list(entries: &[AllowEntry]) -> Result<(), AllowListViolation> {
    for (element, attributes) in entries {
        let element_lower = element.to_ascii_lowercase();
        if FORBIDDEN_ELEMENTS.contains(&element_lower.as_str()) {
            return Err(AllowListViolation::Element(element_lower));
        }

        for attribute in attributes.iter() {
            let attribute_lower = attribute.to_ascii_lowercase();
            if attribute_lower.starts_with("on")
                || FORBIDDEN_ATTRIBUTES.contains(&attribute_lower.as_str())
            {
                return Err(AllowListViolation::Attribute {
                    element: element_lower,
                    attribute: attribute_lower,
                });
            }
        }
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
