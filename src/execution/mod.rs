//! The `execute` boundary: classify, render, run, shape.

use crate::{
    classify::{classify_with, EntryPointDetector, RegexDetector},
    config::ExecConfig,
    directives::{Directives, ResultType},
    error::{Error, Result},
    process,
    shape::{shape, trim_trailing_newline, ShapedResult},
    template::render,
};

/// Build the program a snippet would be run as, without running it.
pub fn expand(snippet: &str, config: &ExecConfig) -> Result<String> {
    expand_with(&RegexDetector, snippet, config)
}

fn expand_with<D>(detector: &D, snippet: &str, config: &ExecConfig) -> Result<String>
where
    D: EntryPointDetector + ?Sized,
{
    let split = classify_with(detector, &config.wrapper_template, snippet);
    render(split.top, split.wrapper, split.main)
}

/// Run one block and shape its result.
pub fn execute(snippet: &str, directives: &Directives, config: &ExecConfig) -> Result<ShapedResult> {
    execute_with(&RegexDetector, snippet, directives, config)
}

/// [`execute`] with a caller-supplied entry-point detector.
pub fn execute_with<D>(
    detector: &D,
    snippet: &str,
    directives: &Directives,
    config: &ExecConfig,
) -> Result<ShapedResult>
where
    D: EntryPointDetector + ?Sized,
{
    if let Some(session) = directives.requested_session() {
        return Err(Error::SessionUnsupported { session: session.to_string() });
    }

    let split = classify_with(detector, &config.wrapper_template, snippet);
    if split.is_identity() && directives.result_type == ResultType::Value {
        // The block's own main runs as-is, so prints are not suppressed and
        // no return value is captured.
        tracing::warn!("snippet declares main(); value results are not captured, using program output");
    }
    let program = render(split.top, split.wrapper, split.main)?;
    tracing::debug!(bytes = program.len(), identity = split.is_identity(), "synthesized program");

    let command = directives.cmd.as_deref().unwrap_or(&config.command);
    let outcome = process::invoke(config, command, &program, directives.result_type.mode())?;
    if !outcome.stderr.is_empty() {
        tracing::debug!(stderr = %outcome.stderr.trim_end(), "dart wrote to stderr");
    }

    Ok(shape(trim_trailing_newline(&outcome.stdout), &directives.result_format))
}
