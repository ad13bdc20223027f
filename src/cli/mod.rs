//! CLI module for Magnetar
//!
//! Command-line interface definitions and handlers for the Magnetar router.
//!
//! # Commands
//!
//! - `serve` - Start the router
//! - `workers` - Show the configured worker pool
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start the router with default config
//! magnetar serve
//!
//! # Inspect the pool in rotation order
//! magnetar workers
//!
//! # Generate shell completions
//! magnetar completions bash > ~/.bash_completion.d/magnetar
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod serve;
pub mod workers;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Magnetar - Stateless edge reverse proxy
#[derive(Parser, Debug)]
#[command(
    name = "magnetar",
    version,
    about = "Stateless edge reverse proxy with pluggable worker selection"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the router
    Serve(ServeArgs),
    /// Show the configured worker pool
    Workers(WorkersArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "magnetar.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "MAGNETAR_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "MAGNETAR_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MAGNETAR_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct WorkersArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "magnetar.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "magnetar.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
