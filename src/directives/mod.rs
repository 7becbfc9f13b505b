//! Execution directives passed in with each block.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which text counts as the block's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    /// Everything the program prints.
    Output,
    /// The stringified return value, with ordinary printing suppressed.
    #[default]
    Value,
}

impl ResultType {
    /// The mode argument handed to the synthesized program.
    pub fn mode(self) -> &'static str {
        match self {
            ResultType::Output => "output",
            ResultType::Value => "value",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mode())
    }
}

impl FromStr for ResultType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "output" => Ok(ResultType::Output),
            "value" => Ok(ResultType::Value),
            other => Err(format!("unknown result type `{}` (expected `output` or `value`)", other)),
        }
    }
}

/// Rendering flags from the `:results` header argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultFormat {
    /// Return the captured text untouched instead of guessing at a table.
    pub raw: bool,
    /// Remaining `:results` words (`table`, `list`, `scalar`, ...). The host
    /// interprets these; shaping only checks them through [`forces_scalar`].
    ///
    /// [`forces_scalar`]: ResultFormat::forces_scalar
    #[serde(default)]
    pub other: Vec<String>,
}

/// `:results` words whose rendering never takes a table.
const SCALAR_WORDS: &[&str] = &["scalar", "pp", "code", "html", "latex", "org", "drawer", "file", "link"];

impl ResultFormat {
    pub fn raw() -> Self {
        Self { raw: true, other: Vec::new() }
    }

    /// True when the captured text must come back as a string: `raw` is set
    /// or one of the scalar-forcing `:results` words was given.
    pub fn forces_scalar(&self) -> bool {
        self.raw || self.other.iter().any(|w| SCALAR_WORDS.contains(&w.as_str()))
    }
}

/// Everything the host document says about how to run one block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directives {
    pub result_type: ResultType,
    pub result_format: ResultFormat,
    /// Replaces the configured toolchain command for this block only.
    pub cmd: Option<String>,
    /// Session name. `None` and `"none"` both mean no session.
    pub session: Option<String>,
    /// Header arguments the core does not interpret, in the order given.
    #[serde(default)]
    pub extra: Vec<(String, String)>,
}

impl Directives {
    pub fn new(result_type: ResultType) -> Self {
        Self { result_type, ..Self::default() }
    }

    /// The session name, if one is actually being requested.
    pub fn requested_session(&self) -> Option<&str> {
        self.session
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("none"))
    }

    /// Apply the words of a `:results` header argument.
    ///
    /// `output` and `value` pick the result type (last one wins), `raw` and
    /// its alias `verbatim` set the raw flag, anything else is kept for the
    /// host. Kept words such as `scalar`, `pp` or `drawer` still stop table
    /// shaping (see [`ResultFormat::forces_scalar`]).
    pub fn apply_results_words(&mut self, words: &str) {
        for word in words.split_whitespace() {
            match word.to_ascii_lowercase().as_str() {
                "output" => self.result_type = ResultType::Output,
                "value" => self.result_type = ResultType::Value,
                "raw" | "verbatim" => self.result_format.raw = true,
                other => self.result_format.other.push(other.to_string()),
            }
        }
    }

    /// Parse a header-argument string such as
    /// `:results output raw :cmd dart :session none :exports both`.
    ///
    /// Values run until the next `:key` token. Text before the first key is
    /// ignored.
    pub fn from_header_args(header: &str) -> Self {
        let mut directives = Self::default();
        directives.apply_header_args(header);
        directives
    }

    /// Layer a header-argument string over the current directives.
    pub fn apply_header_args(&mut self, header: &str) {
        for (key, value) in split_header_args(header) {
            self.apply(&key, &value);
        }
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "results" => self.apply_results_words(value),
            "cmd" if !value.is_empty() => self.cmd = Some(value.to_string()),
            "session" => {
                self.session = Some(if value.is_empty() { "none".into() } else { value.to_string() })
            }
            _ => self.extra.push((key.to_string(), value.to_string())),
        }
    }
}

fn split_header_args(header: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for token in header.split_whitespace() {
        if let Some(key) = token.strip_prefix(':').filter(|k| !k.is_empty()) {
            pairs.push((key.to_ascii_lowercase(), String::new()));
        } else if let Some((_, value)) = pairs.last_mut() {
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(token);
        }
    }
    pairs
}
