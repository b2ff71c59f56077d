//! Update command implementation.

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use std::path::Path;
use tracing::{error, info, warn};

use super::{load_config, load_feeds, successful_lines};
use crate::emitter::{emit_all, OutputTarget};
use crate::fetcher::FetchMode;
use crate::fs_abstraction::real_fs;
use crate::lock::LockGuard;
use crate::pipeline::{consolidate, load_local_lists};
use crate::stats::{FeedStats, RunState};
use crate::utils::format_count;

/// Run the update command
pub async fn run(dry_run: bool, force: bool, offline: bool, config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let _lock = LockGuard::acquire(&config.data_dir)?;

    let mode = if offline {
        FetchMode::Offline
    } else if force {
        FetchMode::Force
    } else {
        FetchMode::Normal
    };

    info!("Updating blocklist...");

    let enabled = config.enabled_feeds();
    if enabled.is_empty() {
        warn!("No feeds enabled. Check your configuration.");
    }

    let outcomes = load_feeds(&config, mode).await?;
    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|o| o.result.is_err())
        .map(|o| o.name.as_str())
        .collect();
    if !failed.is_empty() && config.fetch.failure_fatal {
        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                error!("{}", e);
            }
        }
        anyhow::bail!("Failed to load feeds: {}", failed.join(", "));
    }
    let feeds = successful_lines(&outcomes);

    let fs = real_fs();
    let lists = load_local_lists(fs, &config.lists).context("Failed to read local lists")?;
    let classifier = config.classifier();
    let consolidation = consolidate(&feeds, &lists, &classifier);

    info!(
        "{} candidate hosts -> {} blocklist entries ({} whole domains)",
        format_count(consolidation.report.candidates),
        format_count(consolidation.report.blocked),
        format_count(consolidation.report.apexes)
    );

    if dry_run {
        println!();
        println!(
            "[DRY-RUN] {} entries would be written to {} target(s)",
            format_count(consolidation.hosts.len()),
            config.enabled_targets().len()
        );
        return Ok(());
    }

    let targets: Vec<OutputTarget> = config
        .enabled_targets()
        .into_iter()
        .map(OutputTarget::from)
        .collect();
    if targets.is_empty() {
        warn!("No targets enabled. Nothing will be written.");
    }
    let outcomes_written = emit_all(fs, &targets, &consolidation.hosts, Local::now().naive_local());

    let state = RunState {
        last_update: Some(Utc::now()),
        feeds: outcomes.iter().map(FeedStats::from_outcome).collect(),
        report: consolidation.report.clone(),
        targets_written: outcomes_written
            .iter()
            .filter(|o| o.is_ok())
            .map(|o| o.target.clone())
            .collect(),
    };
    state
        .save(fs, &config.state_path())
        .context("Failed to save run state")?;

    let failed_targets: Vec<&str> = outcomes_written
        .iter()
        .filter(|o| !o.is_ok())
        .map(|o| o.target.as_str())
        .collect();
    if !failed_targets.is_empty() {
        anyhow::bail!("Failed to write targets: {}", failed_targets.join(", "));
    }

    println!();
    println!(
        "[OK] {} entries written to {} target(s)",
        format_count(consolidation.hosts.len()),
        outcomes_written.len()
    );

    Ok(())
}
