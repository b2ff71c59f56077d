//! hostfold - hosts blocklist consolidator for DNS resolvers
//!
//! Merges ad/tracker/malware host feeds into one minimal blocklist and
//! writes it as resolver configuration.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use hostfold::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Update {
            dry_run,
            force,
            offline,
        } => hostfold::commands::update::run(dry_run, force, offline, &cli.config).await,
        Commands::Check { host } => hostfold::commands::check::run(&host, &cli.config).await,
        Commands::Domains { min } => hostfold::commands::domains::run(min, &cli.config).await,
        Commands::Init => hostfold::commands::init::run(&cli.config).await,
        Commands::Stats => hostfold::commands::stats::run(&cli.config).await,
        Commands::Version => {
            println!("hostfold {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
