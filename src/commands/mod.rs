//! CLI command implementations.

pub mod check;
pub mod domains;
pub mod init;
pub mod stats;
pub mod update;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

use crate::aggregator::FeedLines;
use crate::config::Config;
use crate::fetcher::{FeedOutcome, FetchMode, Fetcher};
use crate::fs_abstraction::RealFileSystem;

/// Load the config file, falling back to defaults when it does not exist.
pub(crate) fn load_config(config_path: &Path) -> Result<Config> {
    if config_path.exists() {
        Config::load(config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))
    } else {
        warn!(
            "Config file {:?} not found, using defaults (run `hostfold init`)",
            config_path
        );
        Ok(Config::default())
    }
}

/// Load every enabled feed in `mode`.
pub(crate) async fn load_feeds(config: &Config, mode: FetchMode) -> Result<Vec<FeedOutcome>> {
    let fetcher = Fetcher::new(config, Arc::new(RealFileSystem))?;
    let feeds = config.enabled_feeds();
    Ok(fetcher.load_feeds(&feeds, mode).await)
}

/// Lines of the feeds that loaded; failures are logged and skipped.
pub(crate) fn successful_lines(outcomes: &[FeedOutcome]) -> Vec<FeedLines> {
    outcomes
        .iter()
        .filter_map(|outcome| match &outcome.result {
            Ok(loaded) => Some(loaded.lines.clone()),
            Err(e) => {
                warn!("{}", e);
                None
            }
        })
        .collect()
}
