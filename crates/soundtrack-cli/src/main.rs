//! Soundtrack CLI - Command-line interface for the soundtrack builder
//!
//! This binary validates soundtrack configs and builds their tracks.

use clap::Parser;
use std::process::ExitCode;

use soundtrack_cli::commands;

mod cli_args;
use cli_args::{Cli, Commands};

/// Initializes logging; `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { config, json } => {
            init_logging(false);
            commands::validate::run(&config, json)
        }
        Commands::Build {
            config,
            output,
            jobs,
            json,
            verbose,
        } => {
            init_logging(verbose);
            commands::build::run(&config, output.as_deref(), jobs, json)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
