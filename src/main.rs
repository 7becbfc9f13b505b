mod cli;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

use dart_babel::{
    config::Config,
    directives::{Directives, ResultType},
    printer::{render_json, render_result, TextPrinter},
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli::Cli::parse()) {
        let color = io::stderr().is_terminal().then_some("red");
        TextPrinter { color }.eprint(&format!("error: {:#}", e));
        std::process::exit(1);
    }
}

fn run(args: cli::Cli) -> Result<()> {
    let cfg = Config::load();

    let snippet = read_snippet(args.file.as_deref())?;

    // Directives: configured default, then header args, then explicit flags.
    let mut directives = Directives::new(cfg.default_result_type());
    if let Some(header) = args.header.as_deref() {
        directives.apply_header_args(header);
    }
    if let Some(words) = args.results.as_deref() {
        directives.apply_results_words(words);
    }
    if args.value {
        directives.result_type = ResultType::Value;
    } else if args.output {
        directives.result_type = ResultType::Output;
    }
    if args.raw {
        directives.result_format.raw = true;
    }
    if let Some(cmd) = args.cmd {
        directives.cmd = Some(cmd);
    }
    if let Some(session) = args.session {
        directives.session = Some(session);
    }

    let mut exec = cfg
        .exec_config()
        .with_context(|| format!("loading configuration from {}", cfg.config_path.display()))?;
    if args.keep_scratch {
        exec.keep_scratch = true;
    }

    if args.expand {
        let program = dart_babel::expand(&snippet, &exec)?;
        print!("{}", program);
        return Ok(());
    }

    tracing::info!(mode = %directives.result_type, "executing dart block");
    let result = dart_babel::execute(&snippet, &directives, &exec)?;

    if args.json {
        println!("{}", render_json(&result)?);
    } else {
        TextPrinter { color: None }.print(&render_result(&result));
    }
    Ok(())
}

fn read_snippet(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("reading Dart block from {}", path.display())),
        _ => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                bail!("no Dart block given: pass a FILE or pipe the block on stdin");
            }
            let mut buf = String::new();
            stdin.lock().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
