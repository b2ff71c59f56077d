//! Registrable-domain classification.
//!
//! A host's registrable domain is its last two labels, or its last three when
//! the last two form a known multi-part country-code suffix such as `co.uk`
//! or `com.au`. A host that *is* its own registrable domain is an apex.

use std::collections::HashSet;

/// Country codes whose registries hand out names under `co.<cc>` and/or
/// `com.<cc>`.
pub const MULTIPART_COUNTRY_CODES: &[&str] = &[
    "ar", "au", "bo", "br", "co", "cc", "id", "il", "in", "hk", "jp", "kr", "kz", "mx", "nz", "ph",
    "rs", "tr", "ua", "uk", "uy", "vn", "za",
];

/// Default multi-part suffix list: `co.<cc>` and `com.<cc>` for every entry
/// of [`MULTIPART_COUNTRY_CODES`].
pub fn default_multipart_suffixes() -> Vec<String> {
    MULTIPART_COUNTRY_CODES
        .iter()
        .flat_map(|cc| [format!("co.{}", cc), format!("com.{}", cc)])
        .collect()
}

/// Reserved TLD some feeds use for honeytoken entries.
pub const RESERVED_SUFFIX: &str = ".invalid";

/// True for hosts under the reserved `.invalid` TLD, which are never blocked.
pub fn is_reserved(host: &str) -> bool {
    host.ends_with(RESERVED_SUFFIX)
}

/// Returns the last `n` labels of `host`, or `None` if it has fewer.
fn last_labels(host: &str, n: usize) -> Option<&str> {
    let mut dots = 0;
    for (idx, byte) in host.bytes().enumerate().rev() {
        if byte == b'.' {
            dots += 1;
            if dots == n {
                return Some(&host[idx + 1..]);
            }
        }
    }
    (dots + 1 == n).then_some(host)
}

/// Classifies hosts by registrable domain using a fixed suffix list.
#[derive(Debug, Clone)]
pub struct DomainClassifier {
    suffixes: HashSet<String>,
}

impl DomainClassifier {
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            suffixes: suffixes
                .into_iter()
                .map(|s| s.as_ref().trim().trim_matches('.').to_ascii_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn suffix_count(&self) -> usize {
        self.suffixes.len()
    }

    /// Registrable domain of `host`, borrowed from it.
    ///
    /// Single-label hosts are returned unchanged. Total over any input.
    pub fn registrable_domain<'h>(&self, host: &'h str) -> &'h str {
        let Some(last_two) = last_labels(host, 2) else {
            return host;
        };
        if self.suffixes.contains(last_two) {
            if let Some(last_three) = last_labels(host, 3) {
                return last_three;
            }
        }
        last_two
    }

    /// True if `host` is an apex: it has at least two labels and is its own
    /// registrable domain.
    pub fn is_apex_candidate(&self, host: &str) -> bool {
        host.contains('.') && self.registrable_domain(host) == host
    }
}

impl Default for DomainClassifier {
    fn default() -> Self {
        Self::new(default_multipart_suffixes())
    }
}
