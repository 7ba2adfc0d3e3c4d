//! Inlay CLI - static API reference generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "inlay")]
#[command(about = "Render an API reference site from a pre-parsed symbol database")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to inlay.toml config file
    #[arg(short, long, default_value = "inlay.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter inlay.toml in the current directory
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Build the reference site from a doclet database
    Build {
        /// Doclet database JSON emitted by the parser
        #[arg(short, long, default_value = "doclets.json")]
        data: PathBuf,

        /// Tutorial tree JSON
        #[arg(short, long)]
        tutorials: Option<PathBuf>,

        /// Output directory (defaults to the config destination)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { force } => {
            commands::init::run(force)?;
        }
        Commands::Build {
            data,
            tutorials,
            output,
        } => {
            commands::build::run(&cli.config, &data, tutorials.as_deref(), output)?;
        }
    }

    Ok(())
}
