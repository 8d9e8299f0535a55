//! amalgam CLI — the main entry point.
//!
//! Commands:
//! - `generate` — Write the amalgamated outputs
//! - `list`     — Show the resolved file table
//! - `check`    — Diagnose inputs and markers
//! - `config`   — Show, locate, or initialize the config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "amalgam",
    about = "amalgam — single-file distributions of the Backbone library",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (default: ./amalgam.toml)
    #[arg(short, long, global = true, env = "AMALGAM_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the amalgamated outputs
    Generate {
        /// Only generate these output groups (repeatable)
        #[arg(short, long = "group")]
        groups: Vec<String>,

        /// Render everything but write nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// List output groups and their sources in order
    List {
        /// Emit the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that every source is readable and its markers are sane
    Check,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Print the config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Generate { groups, dry_run } => {
            commands::generate::run(config, &groups, dry_run)?
        }
        Commands::List { json } => commands::list::run(config, json)?,
        Commands::Check => commands::check::run(config)?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show(config)?,
            ConfigAction::Path => commands::config_cmd::path(config)?,
            ConfigAction::Init { force } => commands::config_cmd::init(config, force)?,
        },
    }

    Ok(())
}
