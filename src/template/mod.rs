//! Placeholder substitution for wrapper templates.
//!
//! Expansion is one left-to-right pass over the template. Expanded text is
//! never scanned again, so a snippet containing `%s` or `%a` is inserted
//! as-is.

use crate::error::{Error, Result};
use crate::wrapper::IDENTITY_TEMPLATE;

pub const ASYNC_PLACEHOLDER: &str = "%a";
pub const AWAIT_PLACEHOLDER: &str = "%w";
pub const MAIN_PLACEHOLDER: &str = "%s";

const ASYNC_TOKEN: &str = "async";
const AWAIT_TOKEN: &str = "await";

enum Expansion<'a> {
    Fixed(&'static str),
    Main(&'a str),
}

fn lookup<'a>(symbol: char, main: &'a str) -> Option<Expansion<'a>> {
    match symbol {
        'a' => Some(Expansion::Fixed(ASYNC_TOKEN)),
        'w' => Some(Expansion::Fixed(AWAIT_TOKEN)),
        's' => Some(Expansion::Main(main)),
        '%' => Some(Expansion::Fixed("%")),
        _ => None,
    }
}

/// Render `top` followed by `wrapper` with its placeholders expanded.
///
/// A wrapper other than the identity template must contain `%s`.
pub fn render(top: &str, wrapper: &str, main: &str) -> Result<String> {
    if wrapper != IDENTITY_TEMPLATE && !wrapper.contains(MAIN_PLACEHOLDER) {
        return Err(Error::MissingPlaceholder { placeholder: MAIN_PLACEHOLDER });
    }

    let mut out = String::with_capacity(top.len() + wrapper.len() + main.len());
    out.push_str(top);
    substitute_into(&mut out, wrapper, main);
    Ok(out)
}

fn substitute_into(out: &mut String, template: &str, main: &str) {
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().and_then(|&next| lookup(next, main)) {
            Some(expansion) => {
                chars.next();
                match expansion {
                    Expansion::Fixed(token) => out.push_str(token),
                    Expansion::Main(text) => out.push_str(text),
                }
            }
            None => out.push('%'),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrapper::{WRAPPER_IMPORTS, WRAPPER_TEMPLATE};

    #[test]
    fn identity_template_emits_main_verbatim() {
        let out = render("import 'dart:io';\n", "%s", "void main() {}").unwrap();
        assert_eq!(out, "import 'dart:io';\nvoid main() {}");
    }

    #[test]
    fn expands_fixed_tokens() {
        let out = render("", "f() %a { %w g(); %s }", "x();").unwrap();
        assert_eq!(out, "f() async { await g(); x(); }");
    }

    #[test]
    fn optional_placeholders_may_be_absent() {
        let out = render("", "run { %s }", "1").unwrap();
        assert_eq!(out, "run { 1 }");
    }

    #[test]
    fn main_is_not_rescanned() {
        let out = render("", "<%s>", "a %s b %a c %% d").unwrap();
        assert_eq!(out, "<a %s b %a c %% d>");
    }

    #[test]
    fn percent_escapes_and_unknown_sequences() {
        let out = render("", "%% %d %s %", "m").unwrap();
        assert_eq!(out, "% %d m %");
    }

    #[test]
    fn missing_main_placeholder_is_rejected() {
        let err = render("", "void main() { %w f(); }", "x").unwrap_err();
        assert!(matches!(err, Error::MissingPlaceholder { placeholder: "%s" }));
    }

    #[test]
    fn output_starts_with_top_and_differs_per_main() {
        let a = render(WRAPPER_IMPORTS, WRAPPER_TEMPLATE, "return 1;").unwrap();
        let b = render(WRAPPER_IMPORTS, WRAPPER_TEMPLATE, "return 2;").unwrap();
        assert!(a.starts_with(WRAPPER_IMPORTS));
        assert!(b.starts_with(WRAPPER_IMPORTS));
        assert_ne!(a, b);
        assert!(a.contains("return 1;"));
        assert!(!a.contains("%a") && !a.contains("%w") && !a.contains("%s"));
        assert!(a.contains("Future<void> main(List<String> args) async {"));
    }
}
