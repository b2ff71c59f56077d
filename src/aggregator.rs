//! Merging of feed lines and the local blacklist into one candidate set.

use std::collections::HashSet;

use crate::normalizer::{normalize_lines, Host};

/// A set of unique, normalized hosts.
pub type HostSet = HashSet<Host>;

/// Raw lines produced by one feed, already sliced and scrubbed.
#[derive(Debug, Clone, Default)]
pub struct FeedLines {
    pub name: String,
    pub lines: Vec<String>,
}

impl FeedLines {
    pub fn new(name: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            lines,
        }
    }

    /// A feed that could not be fetched contributes nothing.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }
}

/// Result of [`aggregate`]: the deduplicated candidates plus line counters.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub hosts: HostSet,
    pub raw_lines: usize,
    pub empty_lines: usize,
    pub rejected_lines: usize,
}

/// Merge every feed and the local blacklist into one deduplicated set.
///
/// Input order never affects the result.
pub fn aggregate(feeds: &[FeedLines], blacklist: &[String]) -> Aggregation {
    let mut out = Aggregation::default();

    let sources = std::iter::once(blacklist).chain(feeds.iter().map(|f| f.lines.as_slice()));
    for lines in sources {
        let normalized = normalize_lines(lines);
        out.raw_lines += normalized.line_count();
        out.empty_lines += normalized.empty;
        out.rejected_lines += normalized.rejected;
        out.hosts.extend(normalized.hosts);
    }

    out
}

/// Normalize a standalone list (e.g. the whitelist) into a set.
pub fn collect_hosts<I, S>(lines: I) -> HostSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    normalize_lines(lines).hosts.into_iter().collect()
}
