use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "dart-babel", about = "Run a Dart source block and print its result", version)]
#[command(group(ArgGroup::new("result_type").args(["value", "output"]).multiple(false)))]
#[command(group(ArgGroup::new("action").args(["expand", "json"]).multiple(false)))]
pub struct Cli {
    /// File holding the Dart block. Reads stdin when omitted or `-`.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Header arguments as written in the document, e.g. ":results output raw".
    #[arg(long = "header", value_name = "ARGS", allow_hyphen_values = true)]
    pub header: Option<String>,

    /// Words of the `:results` header argument (output, value, raw, ...).
    #[arg(long = "results", value_name = "WORDS")]
    pub results: Option<String>,

    /// Return the value of the block (ordinary output is suppressed).
    #[arg(long)]
    pub value: bool,

    /// Return everything the block prints.
    #[arg(long)]
    pub output: bool,

    /// Do not try to turn the result into a table.
    #[arg(long)]
    pub raw: bool,

    /// Toolchain command for this run (defaults to DART_COMMAND or `dart`).
    #[arg(long = "cmd", value_name = "COMMAND")]
    pub cmd: Option<String>,

    /// Session name. Sessions are not supported; anything but `none` fails.
    #[arg(long)]
    pub session: Option<String>,

    /// Print the synthesized program instead of running it.
    #[arg(long)]
    pub expand: bool,

    /// Print the result as JSON (a string or an array of rows).
    #[arg(long)]
    pub json: bool,

    /// Keep the scratch program on disk and report its path.
    #[arg(long = "keep-scratch")]
    pub keep_scratch: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_and_output_conflict() {
        let res = <Cli as Parser>::try_parse_from(["dart-babel", "--value", "--output"]);
        assert!(res.is_err());
    }

    #[test]
    fn header_accepts_leading_colon_words() {
        let cli = <Cli as Parser>::try_parse_from([
            "dart-babel",
            "block.dart",
            "--header",
            ":results output :session none",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("block.dart")));
        assert_eq!(cli.header.as_deref(), Some(":results output :session none"));
    }
}
