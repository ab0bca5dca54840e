//! `quoteform` command-line entry point.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use quoteform_log::Config;

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = quoteform_log::auto_init(log_config(cli.verbose))?;

    match cli.command {
        Command::Products(args) => commands::products::run(&args),
        Command::Quote(args) => commands::quote::run(args),
    }
}

/// Logging used when neither `QUOTEFORM_LOG` nor `RUST_LOG` is set.
fn log_config(verbose: u8) -> Config {
    let mut config = Config::cli();
    config.level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
    .to_owned();
    config
}
