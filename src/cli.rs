//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hostfold")]
#[command(author, version, about = "Hosts blocklist consolidator for DNS resolvers")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "./hostfold.yaml", global = true)]
    pub config: PathBuf,

    /// Quiet mode (for cron/systemd timer)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch feeds, consolidate and write resolver configuration files
    Update {
        /// Fetch and consolidate but don't write any target
        #[arg(long)]
        dry_run: bool,

        /// Ignore cache freshness and download every feed
        #[arg(long, conflicts_with = "offline")]
        force: bool,

        /// Use cached feeds only, never touch the network
        #[arg(long)]
        offline: bool,
    },

    /// Explain whether a host would be blocked (cached feeds only)
    Check {
        /// Host name to check
        host: String,
    },

    /// List domains with many individually blocked hosts (cached feeds only)
    Domains {
        /// Minimum number of blocked hosts per domain
        #[arg(long, default_value = "2")]
        min: usize,
    },

    /// Create a starter configuration, lists and data directory
    Init,

    /// Show statistics of the last update
    Stats,

    /// Show version
    Version,
}
