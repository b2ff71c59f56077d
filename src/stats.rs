//! Run state persistence and statistics display.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

use crate::error::HostfoldError;
use crate::fetcher::FeedOutcome;
use crate::fs_abstraction::FileSystem;
use crate::pipeline::ConsolidationReport;
use crate::utils::{format_count, format_count_with_separator, format_duration_ago, truncate};

/// Persistent record of the last successful update
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RunState {
    pub last_update: Option<DateTime<Utc>>,
    pub feeds: Vec<FeedStats>,
    pub report: ConsolidationReport,
    pub targets_written: Vec<String>,
}

/// Statistics for a single feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedStats {
    pub name: String,
    /// "downloaded", "cached", "stale cache" or "failed"
    pub status: String,
    pub lines: usize,
}

impl FeedStats {
    pub fn from_outcome(outcome: &FeedOutcome) -> Self {
        match &outcome.result {
            Ok(loaded) => Self {
                name: outcome.name.clone(),
                status: loaded.origin.as_str().to_string(),
                lines: loaded.lines.lines.len(),
            },
            Err(_) => Self {
                name: outcome.name.clone(),
                status: "failed".to_string(),
                lines: 0,
            },
        }
    }
}

impl RunState {
    /// Load state from file; a missing file yields the default state.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, HostfoldError> {
        match fs.read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                HostfoldError::fs(path, io::Error::new(io::ErrorKind::InvalidData, e))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(HostfoldError::fs(path, e)),
        }
    }

    /// Save state to file atomically.
    pub fn save(&self, fs: &dyn FileSystem, path: &Path) -> Result<(), HostfoldError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs.create_dir_all(parent)
                .map_err(|e| HostfoldError::fs(parent, e))?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| HostfoldError::fs(path, io::Error::new(io::ErrorKind::InvalidData, e)))?;
        fs.write_atomic(path, content.as_bytes())
            .map_err(|e| HostfoldError::fs(path, e))
    }
}

/// Render the state as the `stats` table.
pub fn render_stats(state: &RunState, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let rule = "══════════════════════════════════════════════════════════════════";

    out.push_str(rule);
    out.push_str("\n HOSTFOLD BLOCKLIST STATISTICS\n");
    out.push_str(rule);
    out.push_str("\n\n");

    if !state.feeds.is_empty() {
        out.push_str(" FEED               STATUS              LINES\n");
        out.push_str(" ────────────────── ────────────── ──────────\n");
        for feed in &state.feeds {
            out.push_str(&format!(
                " {:<18} {:<14} {:>10}\n",
                truncate(&feed.name, 18),
                feed.status,
                format_count(feed.lines)
            ));
        }
        out.push('\n');
    }

    let report = &state.report;
    out.push_str(&format!(
        " Lines read:        {}\n",
        format_count_with_separator(report.raw_lines)
    ));
    out.push_str(&format!(
        " Rejected lines:    {}\n",
        format_count_with_separator(report.rejected_lines)
    ));
    out.push_str(&format!(
        " Candidate hosts:   {}\n",
        format_count_with_separator(report.candidates)
    ));
    out.push_str(&format!(
        " Whitelisted:       {}\n",
        format_count_with_separator(report.whitelist)
    ));
    out.push_str(&format!(
        " Blocked domains:   {}\n",
        format_count_with_separator(report.apexes)
    ));
    out.push_str(&format!(
        " Blocklist entries: {}\n",
        format_count_with_separator(report.blocked)
    ));
    if !state.targets_written.is_empty() {
        out.push_str(&format!(" Targets written:   {}\n", state.targets_written.join(", ")));
    }
    out.push('\n');

    match state.last_update {
        Some(last_update) => {
            let local: DateTime<Local> = last_update.into();
            out.push_str(&format!(
                " Last update: {} ({})\n",
                local.format("%Y-%m-%d %H:%M:%S"),
                format_duration_ago(last_update, now)
            ));
        }
        None => out.push_str(" Last update: never\n"),
    }
    out.push_str(rule);
    out.push('\n');
    out
}
