//! Stats command implementation.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;

use super::load_config;
use crate::fs_abstraction::real_fs;
use crate::stats::{render_stats, RunState};

/// Run the stats command
pub async fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let state = RunState::load(real_fs(), &config.state_path())
        .context("Failed to read run state")?;

    println!();
    print!("{}", render_stats(&state, Utc::now()));
    println!();

    Ok(())
}
