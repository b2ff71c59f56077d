//! Domains command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use super::{load_config, load_feeds, successful_lines};
use crate::fetcher::FetchMode;
use crate::fs_abstraction::real_fs;
use crate::pipeline::{consolidate, domain_counts, load_local_lists};
use crate::utils::truncate;

/// Run the domains command
pub async fn run(min_hosts: usize, config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let outcomes = load_feeds(&config, FetchMode::Offline).await?;
    let feeds = successful_lines(&outcomes);
    let lists = load_local_lists(real_fs(), &config.lists).context("Failed to read local lists")?;

    let classifier = config.classifier();
    let consolidation = consolidate(&feeds, &lists, &classifier);
    let counts = domain_counts(&consolidation.hosts, &classifier, min_hosts.max(1));

    if counts.is_empty() {
        println!("No domain has {} or more individually blocked hosts.", min_hosts);
        return Ok(());
    }

    println!(" DOMAIN                                   HOSTS");
    println!(" ──────────────────────────────────────── ──────");
    for count in &counts {
        println!(" {:<40} {:>6}", truncate(&count.domain, 40), count.hosts);
    }
    println!();
    println!("Add a domain to the blacklist to block it whole.");

    Ok(())
}
