//! deckgen CLI - converts reStructuredText notes into Anki decks.
//!
//! Every `*.rst` file in the current directory, except `README.rst`, is
//! written as `<name>.apkg` next to it. Log verbosity follows `RUST_LOG`
//! (default `warn`).

mod convert;
mod discover;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use deckgen_cards::HttpTitleResolver;
use deckgen_config::Config;
use tracing_subscriber::EnvFilter;

use convert::{Converter, Summary};
use error::CliError;
use output::Output;

/// deckgen - build Anki decks from reStructuredText notes in the current directory.
#[derive(Parser)]
#[command(name = "deckgen", version, about)]
struct Cli;

fn main() -> ExitCode {
    Cli::parse();
    let output = Output::new();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&output) {
        Ok(summary) if summary.failed == 0 => ExitCode::SUCCESS,
        Ok(summary) => {
            output.summary(&summary);
            ExitCode::FAILURE
        }
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}

fn run(output: &Output) -> Result<Summary, CliError> {
    let config = Config::default();
    config.validate()?;

    let dir = std::env::current_dir()?;
    let resolver = HttpTitleResolver::new(&config.resolver);
    Converter::new(&config, &resolver, &dir).run(output)
}
