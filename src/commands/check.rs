//! Check command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use super::{load_config, load_feeds, successful_lines};
use crate::fetcher::FetchMode;
use crate::fs_abstraction::real_fs;
use crate::normalizer::normalize;
use crate::pipeline::{consolidate, load_local_lists};
use crate::reducer::Verdict;

/// Run the check command
pub async fn run(host_str: &str, config_path: &Path) -> Result<()> {
    let host = normalize(host_str)
        .ok_or_else(|| anyhow::anyhow!("Invalid host name: {}", host_str))?;

    let config = load_config(config_path)?;
    let outcomes = load_feeds(&config, FetchMode::Offline).await?;
    let feeds = successful_lines(&outcomes);
    let lists = load_local_lists(real_fs(), &config.lists).context("Failed to read local lists")?;

    let classifier = config.classifier();
    let consolidation = consolidate(&feeds, &lists, &classifier);
    let verdict = consolidation.verdict(&host, &classifier);

    println!();
    let status = if verdict.is_blocked() { "BLOCKED" } else { "NOT blocked" };
    println!("{} is {}", host, status);
    println!("  {}", describe(&verdict));
    println!();

    Ok(())
}

fn describe(verdict: &Verdict) -> String {
    match verdict {
        Verdict::BlockedApex => "whole domain is blocked".to_string(),
        Verdict::Blocked => "listed and emitted as is".to_string(),
        Verdict::CoveredByApex(apex) => format!("covered by blocked domain {}", apex),
        Verdict::CollapsedIntoApex(apex) => format!("listed, emitted as blocked domain {}", apex),
        Verdict::Whitelisted => "whitelisted".to_string(),
        Verdict::DomainWhitelisted(domain) => format!("domain {} is whitelisted", domain),
        Verdict::Loopback => "loopback host is never blocked".to_string(),
        Verdict::Reserved => "reserved .invalid host is never blocked".to_string(),
        Verdict::NotListed => "not listed by any feed or local list".to_string(),
    }
}
