//! Structure classifier: decides whether a snippet already declares `main`.
//!
//! Detection is a textual scan, not a parse. A `main(` signature that only
//! appears inside a string literal or a comment still counts as a match.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::wrapper::{IDENTITY_TEMPLATE, PRELUDE_IMPORTS, WRAPPER_IMPORTS};

/// `[void|dynamic|Future<...>] main[<T>](` at the start of a line.
static ENTRY_POINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:(?:void|dynamic|Future(?:[ \t]*<[^>\n]*>)?)[ \t]+)?main[ \t]*(?:<[^>\n]*>[ \t]*)?\(",
    )
    .expect("entry point pattern is valid")
});

/// Finds an entry-point declaration in raw snippet text.
pub trait EntryPointDetector {
    fn has_entry_point(&self, snippet: &str) -> bool;
}

/// Line-anchored regular-expression scan for Dart's `main` signature.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexDetector;

impl EntryPointDetector for RegexDetector {
    fn has_entry_point(&self, snippet: &str) -> bool {
        ENTRY_POINT.is_match(snippet)
    }
}

/// How a snippet is turned into a program: the wrapper template, the text
/// placed before it, and the fragment substituted for `%s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult<'a> {
    pub wrapper: &'a str,
    pub top: &'static str,
    pub main: &'a str,
}

impl SplitResult<'_> {
    /// True when the snippet is used as a complete program with no wrapping.
    pub fn is_identity(&self) -> bool {
        self.wrapper == IDENTITY_TEMPLATE
    }
}

/// Classify with the default detector and the built-in wrapper program.
pub fn classify(snippet: &str) -> SplitResult<'_> {
    classify_with(&RegexDetector, crate::wrapper::WRAPPER_TEMPLATE, snippet)
}

/// Classify with an explicit detector and wrapper template.
pub fn classify_with<'a, D>(detector: &D, wrapper: &'a str, snippet: &'a str) -> SplitResult<'a>
where
    D: EntryPointDetector + ?Sized,
{
    if detector.has_entry_point(snippet) {
        tracing::debug!("snippet declares main(), running it unwrapped");
        SplitResult { wrapper: IDENTITY_TEMPLATE, top: PRELUDE_IMPORTS, main: snippet }
    } else {
        tracing::debug!("no main() found, embedding snippet in wrapper program");
        SplitResult { wrapper, top: WRAPPER_IMPORTS, main: snippet }
    }
}
