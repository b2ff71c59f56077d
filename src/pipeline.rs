//! End-to-end consolidation: local lists + feed lines -> final blocklist.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

use crate::aggregator::{aggregate, collect_hosts, FeedLines, HostSet};
use crate::apex::{collect_apexes, ApexSet};
use crate::config::ListPaths;
use crate::domain::DomainClassifier;
use crate::error::HostfoldError;
use crate::fs_abstraction::FileSystem;
use crate::normalizer::Host;
use crate::reducer::{reduce, verdict, Verdict};

/// Lines of the locally curated lists.
#[derive(Debug, Clone, Default)]
pub struct LocalLists {
    pub whitelist: Vec<String>,
    /// Personal blacklist followed by the baseline list
    pub blacklist: Vec<String>,
}

/// Read a list file; a missing file is an empty list.
pub fn read_list(fs: &dyn FileSystem, path: &Path) -> Result<Vec<String>, HostfoldError> {
    match fs.read_to_string(path) {
        Ok(content) => Ok(content.lines().map(str::to_string).collect()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("List file {} not found, treating as empty", path.display());
            Ok(Vec::new())
        }
        Err(e) => Err(HostfoldError::fs(path, e)),
    }
}

/// Load whitelist, blacklist and (optional) baseline.
pub fn load_local_lists(fs: &dyn FileSystem, paths: &ListPaths) -> Result<LocalLists, HostfoldError> {
    let whitelist = read_list(fs, &paths.whitelist)?;
    let mut blacklist = read_list(fs, &paths.blacklist)?;
    if let Some(baseline) = &paths.baseline {
        blacklist.extend(read_list(fs, baseline)?);
    }
    debug!(
        "Local lists: {} whitelist lines, {} blacklist lines",
        whitelist.len(),
        blacklist.len()
    );
    Ok(LocalLists {
        whitelist,
        blacklist,
    })
}

/// Counters describing one consolidation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationReport {
    pub raw_lines: usize,
    pub rejected_lines: usize,
    pub candidates: usize,
    pub whitelist: usize,
    pub apexes: usize,
    pub blocked: usize,
}

/// Every intermediate set of a run plus the final, sorted blocklist.
#[derive(Debug, Clone)]
pub struct Consolidation {
    pub candidates: HostSet,
    pub whitelist: HostSet,
    pub apexes: ApexSet,
    pub hosts: Vec<Host>,
    pub report: ConsolidationReport,
}

impl Consolidation {
    /// Explain the decision taken for `host`.
    pub fn verdict(&self, host: &Host, classifier: &DomainClassifier) -> Verdict {
        verdict(host, &self.candidates, &self.apexes, &self.whitelist, classifier)
    }
}

/// Run normalization, aggregation, apex collection and reduction.
pub fn consolidate(
    feeds: &[FeedLines],
    lists: &LocalLists,
    classifier: &DomainClassifier,
) -> Consolidation {
    let whitelist = collect_hosts(&lists.whitelist);
    debug!("Whitelist contains {} entries", whitelist.len());

    let aggregation = aggregate(feeds, &lists.blacklist);
    debug!(
        "Combined {} lines into {} unique hosts ({} rejected)",
        aggregation.raw_lines,
        aggregation.hosts.len(),
        aggregation.rejected_lines
    );

    let apexes = collect_apexes(&aggregation.hosts, &whitelist, classifier);
    debug!("Fully-blocked domain list contains {} entries", apexes.len());

    let hosts = reduce(&aggregation.hosts, &apexes, &whitelist, classifier);
    debug!("Final blocklist contains {} entries", hosts.len());

    let report = ConsolidationReport {
        raw_lines: aggregation.raw_lines,
        rejected_lines: aggregation.rejected_lines,
        candidates: aggregation.hosts.len(),
        whitelist: whitelist.len(),
        apexes: apexes.len(),
        blocked: hosts.len(),
    };

    Consolidation {
        candidates: aggregation.hosts,
        whitelist,
        apexes,
        hosts,
        report,
    }
}

/// Number of individually blocked hosts under one registrable domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCount {
    pub domain: String,
    pub hosts: usize,
}

/// Registrable domains that are not blocked whole but have at least
/// `min_hosts` blocked hosts, busiest first. Candidates for the blacklist.
pub fn domain_counts(
    blocked: &[Host],
    classifier: &DomainClassifier,
    min_hosts: usize,
) -> Vec<DomainCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for host in blocked {
        let domain = classifier.registrable_domain(host.as_str());
        if domain != host.as_str() {
            *counts.entry(domain).or_default() += 1;
        }
    }

    let mut out: Vec<DomainCount> = counts
        .into_iter()
        .filter(|(_, n)| *n >= min_hosts)
        .map(|(domain, hosts)| DomainCount {
            domain: domain.to_string(),
            hosts,
        })
        .collect();
    out.sort_by(|a, b| b.hosts.cmp(&a.hosts).then_with(|| a.domain.cmp(&b.domain)));
    out
}
