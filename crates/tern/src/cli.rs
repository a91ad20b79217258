use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tern: bootstrap an application and dispatch requests to it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Kernel configuration file (.json, .yaml or .toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory of the file cache, overriding the configuration
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Environment file, overriding the configuration
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch one request and print the response
    Dispatch {
        /// Requested path, optionally with a query string
        path: String,
        /// Request method
        #[arg(long, default_value = "GET")]
        method: String,
    },
    /// Manage the registry cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
    /// Print the environment the application sees
    Env,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Remove every cached entry
    Clear,
}
