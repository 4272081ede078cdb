//! strix: parse JavaScript and TypeScript files from the command line.
//!
//! Usage:
//!   strix [options] <file...>
//!
//! Each file is parsed independently. The exit code is the number of
//! files that failed to parse, capped at the usual process limits.

use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use strix_ast::{ScriptExtension, ScriptKind};
use strix_parser::ParserImpl;
use tracing::debug;

#[derive(ClapParser, Debug)]
#[command(name = "strix", about = "strix - A fast JS/TS parser front-end written in Rust")]
struct Cli {
    /// Files to parse.
    #[arg(value_name = "FILE", required = true)]
    files: Vec<String>,

    /// Parse as a module regardless of extension.
    #[arg(short = 'm', long)]
    module: bool,

    /// Parse as CommonJS.
    #[arg(long)]
    commonjs: bool,

    /// Print the AST of each file.
    #[arg(long)]
    ast: bool,

    /// Print the module record of each module as JSON.
    #[arg(long = "moduleRecord")]
    module_record: bool,

    /// Enable pretty printing for diagnostics.
    #[arg(long, default_value_t = true)]
    pretty: bool,
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.module && cli.commonjs {
        print_error("--module and --commonjs are mutually exclusive");
        process::exit(1);
    }

    let start = Instant::now();
    let mut failed = 0;
    for file in &cli.files {
        if !parse_file(&cli, file) {
            failed += 1;
        }
    }
    let elapsed = start.elapsed();

    if cli.pretty && atty_is_terminal() {
        eprintln!(
            "{}Parsed {} file{} in {:.2}s.{}",
            GRAY,
            cli.files.len(),
            if cli.files.len() == 1 { "" } else { "s" },
            elapsed.as_secs_f64(),
            RESET
        );
    }
    process::exit(failed);
}

fn parse_file(cli: &Cli, file: &str) -> bool {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            print_error(&format!("Failed to read '{}': {}", file, e));
            return false;
        }
    };

    let extension = extension_of(file);
    let kind = script_kind(cli, file);
    debug!(file, ?extension, ?kind, "parsing");

    let arena = bumpalo::Bump::new();
    let parser = ParserImpl::new(extension);
    let program = match parser.parse(&arena, file, &source, file, kind) {
        Ok(p) => p,
        Err(e) => {
            print_diagnostic(&e, cli.pretty && atty_is_terminal());
            return false;
        }
    };

    if cli.ast {
        println!("{:#?}", program.ast);
    }
    if cli.module_record {
        if let Some(record) = &program.module_record {
            match serde_json::to_string_pretty(record) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    print_error(&format!("Failed to serialize module record: {}", e));
                    return false;
                }
            }
        }
    }
    true
}

fn extension_of(file: &str) -> ScriptExtension {
    match Path::new(file).extension().and_then(|e| e.to_str()) {
        Some("ts") | Some("tsx") | Some("mts") | Some("cts") => ScriptExtension::Ts,
        Some("ets") => ScriptExtension::As,
        _ => ScriptExtension::Js,
    }
}

fn script_kind(cli: &Cli, file: &str) -> ScriptKind {
    if cli.commonjs {
        return ScriptKind::CommonJs;
    }
    if cli.module {
        return ScriptKind::Module;
    }
    match Path::new(file).extension().and_then(|e| e.to_str()) {
        Some("mjs") | Some("mts") => ScriptKind::Module,
        Some("cjs") | Some("cts") => ScriptKind::CommonJs,
        // .ts and .ets default to module syntax, matching bundler usage.
        Some("ts") | Some("tsx") | Some("ets") => ScriptKind::Module,
        _ => ScriptKind::Script,
    }
}

fn print_diagnostic(err: &strix_diagnostics::Error, use_color: bool) {
    if use_color {
        eprintln!(
            "{}{}:{}:{}{}: {}{}error{}: {}",
            CYAN, err.file, err.line, err.column, RESET, BOLD, RED, RESET, err.message
        );
    } else {
        eprintln!("{}", err);
    }
}

fn print_error(msg: &str) {
    if atty_is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

fn atty_is_terminal() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::isatty(2) != 0 }
    }
    #[cfg(not(unix))]
    {
        true
    }
}
