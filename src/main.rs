//! dsl2term — convert a DSL dictionary source into a Yomitan term bank.
//!
//! One-shot batch conversion: read the source, split it into cards, parse
//! each card's markup, and write a single JSON array of term records.
//! Malformed cards are dropped with a warning; only file-level I/O errors
//! abort the run.
//!
//! Exit codes: 0 — converted at least one entry; 1 — input unreadable or
//! output unwritable; 2 — run completed but produced zero valid entries.

mod bank;
mod content;
mod headword;
mod markup;
mod model;
mod split;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "dsl2term",
    about = "Convert a DSL dictionary file into a Yomitan term-bank JSON array"
)]
struct Cli {
    /// Input DSL file. If omitted, reads from stdin.
    input: Option<PathBuf>,

    /// Output JSON file. If omitted, writes to stdout.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output (2-space indent)
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let source = read_input(cli.input.as_deref())?;

    let result = bank::build(&source);
    for (headword, reason) in &result.dropped {
        eprintln!("warning: dropping entry \"{}\": {}", headword, reason);
    }

    let json = bank::to_json(&result.records, cli.pretty).context("failed to serialize term bank")?;
    write_output(cli.output.as_deref(), &json)?;

    eprintln!(
        "{} entries converted, {} dropped",
        result.records.len(),
        result.dropped.len()
    );

    if result.records.is_empty() {
        eprintln!("no valid entries found in input");
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

fn read_input(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn write_output(path: Option<&std::path::Path>, json: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(json.as_bytes())
                .and_then(|()| handle.write_all(b"\n"))
                .context("failed to write stdout")
        }
    }
}
