//! `flownest` command-line shell over `flownest_core`.
//!
//! # Responsibility
//! - Map subcommands to `Dashboard` operations and print the result.
//! - Report any failure as one line on stderr with exit code 1.

use clap::Parser;
use flownest_core::{init_logging, CoreConfig, Dashboard};
use log::error;
use std::process::ExitCode;

mod args;
mod commands;
mod error;

use args::Cli;
use error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = build_config(&cli);
    config.validate()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let mut dashboard = if cli.ephemeral {
        Dashboard::open_in_memory()?
    } else {
        Dashboard::open(&config)?
    };
    commands::dispatch(&mut dashboard, &config, cli.command)
}

fn build_config(cli: &Cli) -> CoreConfig {
    let mut config = CoreConfig::default();
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    config.log_dir = cli.log_dir.clone();
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.quotes.generative_api_key = cli
        .gemini_api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string);
    config
}
