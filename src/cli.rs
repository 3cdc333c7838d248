use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Nopeus - declarative deployment orchestrator
#[derive(Parser, Debug)]
#[command(name = "nopeus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI (one JSON event per line)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision infrastructure and deploy every service in the config
    Liftoff {
        /// Path to the application config
        #[arg(short, long, default_value = "nopeus.yaml")]
        config: PathBuf,

        /// Render everything without applying infrastructure or installing releases
        #[arg(long)]
        dry_run: bool,

        /// Token for the remote state cache (overrides NOPEUS_TOKEN)
        #[arg(short, long)]
        token: Option<String>,

        /// Only deploy these environments (repeatable)
        #[arg(short, long = "env", value_name = "ENV")]
        environments: Vec<String>,

        /// Image tag applied to every service, overriding per-service versions
        #[arg(long)]
        image_version: Option<String>,
    },
}
