use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `Metabolical` - session-aware chat relay for a local generation engine.
#[derive(Parser, Debug)]
#[command(name = "metabolical")]
#[command(version)]
#[command(about = "A session-aware chat relay for a local text-generation engine.", long_about = None)]
pub struct Cli {
    /// Read this config file instead of ~/.metabolical/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose (debug-level) logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP relay
    Serve {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Print the effective configuration with secrets redacted
    Config,
}
