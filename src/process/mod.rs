//! Runs the Dart toolchain against a scratch copy of the synthesized program.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tempfile::{Builder, NamedTempFile};

use crate::config::ExecConfig;
use crate::error::{Error, Result};

/// What the toolchain printed. Only produced for a zero exit status.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOutcome {
    pub stdout: String,
    pub stderr: String,
    /// Set when the scratch program was kept on disk.
    pub scratch_path: Option<PathBuf>,
}

/// Write `program` to a fresh scratch file and run
/// `<command...> <scratch-path> <mode>` to completion.
pub fn invoke(config: &ExecConfig, command: &str, program: &str, mode: &str) -> Result<ExecutionOutcome> {
    let mut words = command.split_whitespace();
    let program_name = words
        .next()
        .ok_or_else(|| Error::Configuration("toolchain command is empty".into()))?;
    let leading_args: Vec<&str> = words.collect();

    let scratch = write_scratch(config, program)?;
    tracing::debug!(
        command = %command,
        path = %scratch.path().display(),
        mode,
        "running dart program"
    );

    let output = Command::new(program_name)
        .args(&leading_args)
        .arg(scratch.path())
        .arg(mode)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                Error::Configuration(format!("toolchain command `{}` not found", program_name))
            } else {
                Error::Spawn { command: command.to_string(), source }
            }
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    tracing::debug!(status = ?output.status.code(), stdout_len = stdout.len(), "dart program finished");

    let scratch_path = finish_scratch(config, scratch);

    if !output.status.success() {
        return Err(Error::NonZeroExit {
            command: command.to_string(),
            code: output.status.code(),
            stderr: stderr.trim_end().to_string(),
        });
    }

    Ok(ExecutionOutcome { stdout, stderr, scratch_path })
}

fn write_scratch(config: &ExecConfig, program: &str) -> Result<NamedTempFile> {
    let dir = config.scratch_dir.clone().unwrap_or_else(std::env::temp_dir);
    let io_err = |source| Error::ScratchIo { path: dir.clone(), source };

    let mut file = Builder::new()
        .prefix("dart-babel-")
        .suffix(".dart")
        .tempfile_in(&dir)
        .map_err(io_err)?;
    file.write_all(program.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)?;
    Ok(file)
}

/// Drop the scratch file, or persist it when asked to keep it.
fn finish_scratch(config: &ExecConfig, scratch: NamedTempFile) -> Option<PathBuf> {
    if !config.keep_scratch {
        return None;
    }
    match scratch.keep() {
        Ok((_, path)) => {
            tracing::info!(path = %path.display(), "kept scratch program");
            Some(path)
        }
        Err(e) => {
            tracing::warn!("could not keep scratch program: {}", e);
            None
        }
    }
}

/// Scratch programs left behind in `dir`.
#[cfg(test)]
pub(crate) fn scratch_count(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .map(|rd| {
            rd.filter_map(|e| e.ok())
                .filter(|e| e.file_name().to_string_lossy().starts_with("dart-babel-"))
                .count()
        })
        .unwrap_or(0)
}
