//! Nopeus CLI - declarative deployment orchestrator
//!
//! Usage: nopeus liftoff [OPTIONS]
//!
//! Logging goes to stderr and is controlled by `NOPEUS_LOG`
//! (e.g. `NOPEUS_LOG=nopeus=debug`); `-v` raises the default level.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::liftoff::{cmd_liftoff, LiftoffArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Liftoff {
            config,
            dry_run,
            token,
            environments,
            image_version,
        } => cmd_liftoff(
            &config,
            LiftoffArgs {
                dry_run,
                token,
                environments,
                image_version,
            },
            cli.json,
            cli.verbose,
        ),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("NOPEUS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("nopeus={default_level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
