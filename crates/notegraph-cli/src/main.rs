//! Notegraph CLI - Wiki-link backlinks and note graphs
//!
//! A command-line interface over a folder of Markdown notes that reference
//! each other with `[[wiki links]]`.
//!
//! # Usage
//!
//! ```bash
//! # Index the vault and report what was found
//! notegraph --vault ~/notes index
//!
//! # Which notes link here?
//! notegraph backlinks "Project Ideas"
//!
//! # Where does this note link to?
//! notegraph links journal/2024-01-01.md
//!
//! # Export the note graph for visualization
//! notegraph graph --json > graph.json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use notegraph_config::{LogFormat, NotegraphConfig};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;
mod progress;

/// Notegraph - Backlinks and link graphs for Markdown notes
#[derive(Parser, Debug)]
#[command(name = "notegraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Args, Debug, Clone)]
struct GlobalOptions {
    /// Vault (notes root directory) to operate on
    #[arg(long, short = 'd', global = true, env = "NOTEGRAPH_VAULT")]
    vault: Option<PathBuf>,

    /// Path to a configuration file (replaces global and local config)
    #[arg(long, short = 'c', global = true, env = "NOTEGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Primary note extension, without the dot
    #[arg(long, global = true, env = "NOTEGRAPH_EXTENSION")]
    extension: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "NOTEGRAPH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

impl GlobalOptions {
    /// Convert global options to config overrides
    pub fn to_config_overrides(&self) -> notegraph_config::ConfigOverrides {
        notegraph_config::ConfigOverrides {
            vault_path: self.vault.clone(),
            extension: self.extension.clone(),
            log_level: self.log_level.clone(),
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rebuild the link index and report what was indexed
    Index(commands::index::IndexArgs),

    /// List the notes that link to a note
    Backlinks(commands::backlinks::BacklinksArgs),

    /// List the outgoing links of a note
    Links(commands::links::LinksArgs),

    /// Print the note graph (nodes and edges)
    Graph(commands::graph::GraphArgs),

    /// Show vault, configuration and index status
    Status(commands::status::StatusArgs),

    /// View and manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = commands::load_config(&cli.global)?;
    init_logging(&cli.global, &config)?;

    match cli.command {
        Commands::Index(args) => commands::index::execute(args, &cli.global, &config),
        Commands::Backlinks(args) => commands::backlinks::execute(args, &cli.global, &config),
        Commands::Links(args) => commands::links::execute(args, &cli.global, &config),
        Commands::Graph(args) => commands::graph::execute(args, &cli.global, &config),
        Commands::Status(args) => commands::status::execute(args, &cli.global, &config),
        Commands::Config(cmd) => commands::config::execute(cmd, &cli.global, &config),
    }
}

/// Install the stderr subscriber.
///
/// `--quiet` and `--verbose` win over the configured level and `--log-level`.
fn init_logging(global: &GlobalOptions, config: &NotegraphConfig) -> Result<()> {
    let log_level = if global.quiet {
        Level::ERROR
    } else if global.verbose {
        Level::DEBUG
    } else {
        config.logging.max_level()?
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Text => {
            tracing::subscriber::set_global_default(builder.with_ansi(true).finish())?
        }
    }

    Ok(())
}
