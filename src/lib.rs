//! Execute Dart source blocks embedded in literate documents.
//!
//! The pipeline classifies a snippet, wraps it in a runnable Dart program,
//! runs the `dart` toolchain against a scratch copy of that program, and
//! shapes the captured text into a scalar or a table.

pub mod classify;
pub mod config;
pub mod directives;
pub mod error;
pub mod execution;
pub mod printer;
pub mod process;
pub mod shape;
pub mod template;
pub mod wrapper;

pub use classify::{classify, EntryPointDetector, RegexDetector, SplitResult};
pub use config::{Config, ExecConfig};
pub use directives::{Directives, ResultFormat, ResultType};
pub use error::{Error, Result};
pub use execution::{execute, execute_with, expand};
pub use shape::{shape, ShapedResult};
