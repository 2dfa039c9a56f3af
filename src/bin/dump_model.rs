// src/bin/dump_model.rs
//
// Usage: dump_model <dir> [--tests] [--skip <regex>]...
// Prints the reflection model of every Go package below <dir> as JSON.
// Logs go to stderr, filtered by RUST_LOG; GOREFLECT_LOG_JSON=1 switches
// them to JSON lines.

use std::io::{self, Write};
use std::process::ExitCode;

use goreflect::{ParseOptions, Parser};
use regex::Regex;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    if std::env::var_os("GOREFLECT_LOG_JSON").is_some() {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn options_from_args() -> Result<ParseOptions, String> {
    let mut args = std::env::args().skip(1);
    let mut opts: Option<ParseOptions> = None;
    let mut skips = Vec::new();
    let mut include_tests = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--tests" => include_tests = true,
            "--skip" => {
                let pattern = args.next().ok_or("--skip needs a regex")?;
                skips.push(Regex::new(&pattern).map_err(|e| e.to_string())?);
            }
            _ if opts.is_none() => opts = Some(ParseOptions::new(arg)),
            _ => return Err(format!("unexpected argument `{arg}`")),
        }
    }

    let mut opts = opts.ok_or("usage: dump_model <dir> [--tests] [--skip <regex>]...")?;
    opts.skip_files_with_contents = skips;
    Ok(opts.include_tests(include_tests))
}

fn main() -> ExitCode {
    init_logging();

    let opts = match options_from_args() {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    let results = match Parser::new().parse_directory(&opts) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    for diag in &results.diagnostics {
        eprintln!("warning: {diag}");
    }

    let mut out = io::stdout().lock();
    let written = serde_json::to_writer_pretty(&mut out, &results)
        .map_err(io::Error::from)
        .and_then(|()| writeln!(out));
    match written {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
