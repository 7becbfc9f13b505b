//! Error kinds surfaced by a single invocation.

use std::path::PathBuf;

/// Errors that abort an invocation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("wrapper template is missing the mandatory `{placeholder}` placeholder")]
    MissingPlaceholder { placeholder: &'static str },

    #[error("sessions are not supported for Dart blocks (requested session `{session}`)")]
    SessionUnsupported { session: String },

    #[error("failed to write scratch file in {}: {source}", .path.display())]
    ScratchIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}: {stderr}", describe_status(.code))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl Error {
    /// True for the configuration kinds (missing placeholder, unresolvable
    /// command, unreadable wrapper file).
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_) | Error::MissingPlaceholder { .. })
    }

    /// True for failures while running the external toolchain.
    pub fn is_execution(&self) -> bool {
        matches!(
            self,
            Error::ScratchIo { .. } | Error::Spawn { .. } | Error::NonZeroExit { .. }
        )
    }
}

fn describe_status(code: &Option<i32>) -> String {
    match *code {
        Some(c) => format!("exit code {}", c),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
