//! The Dart scaffold that snippets without their own `main` are embedded in.
//!
//! The payload is Dart source, emitted as text and never run by this crate.
//! Its contract:
//!
//! - `_babelBody` is the execution unit; the snippet becomes its body and it
//!   receives a (currently empty) map of named values.
//! - `output` mode awaits the unit directly, so anything it prints is the
//!   result.
//! - `value` mode awaits the unit inside a zone whose `print` handler drops
//!   every line, then prints the unit's return value once, after the zone's
//!   future has completed.
//! - `main` dispatches on its first argument. Any other value, including no
//!   argument at all, is reported on stderr with exit status 64.

/// Template that emits the main fragment unchanged.
pub const IDENTITY_TEMPLATE: &str = "%s";

/// Full wrapper program. Placeholders are expanded by [`crate::template`].
pub const WRAPPER_TEMPLATE: &str = include_str!("wrapper.dart");

/// Imports placed ahead of a snippet that brings its own `main`.
pub const PRELUDE_IMPORTS: &str = "import 'dart:async';\nimport 'dart:convert';\nimport 'dart:io';\nimport 'dart:math';\n\n";

/// Imports the wrapper program relies on (`runZoned`, `stderr`, `exit`),
/// plus the libraries snippets most commonly reach for.
pub const WRAPPER_IMPORTS: &str = "import 'dart:async';\nimport 'dart:collection';\nimport 'dart:convert';\nimport 'dart:io';\nimport 'dart:math';\n\n";

/// Exit status the wrapper uses for an unrecognized mode argument.
pub const DISPATCH_EXIT_CODE: i32 = 64;
