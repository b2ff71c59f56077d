//! Normalization of raw list lines into canonical hostnames.
//!
//! Every source (fetched feed, local blacklist, whitelist) goes through the
//! same rules:
//!
//! 1. Everything from the first `#` onward is a comment.
//! 2. Surrounding whitespace is trimmed and the rest is lowercased.
//! 3. One leading `www.` label and one trailing root dot are stripped.
//! 4. Anything outside `[a-z0-9.-]` rejects the whole line.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::error::HostfoldError;

/// A canonical hostname.
///
/// Lowercase ASCII, no leading `www.`, no trailing dot, and only the
/// characters `[a-z0-9.-]`. The only way to build one is through
/// [`normalize`] (or [`FromStr`], which delegates to it).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Host(String);

impl Host {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Host {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets `HashSet<Host>` answer `contains(&str)` without allocating.
impl Borrow<str> for Host {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<Host> for String {
    fn from(host: Host) -> Self {
        host.0
    }
}

impl TryFrom<String> for Host {
    type Error = HostfoldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for Host {
    type Err = HostfoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(s).ok_or_else(|| HostfoldError::InvalidHost(s.to_string()))
    }
}

/// Why a line did not yield a [`Host`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Blank line or pure comment.
    Empty,
    /// Contains characters outside `[A-Za-z0-9.-]`.
    InvalidCharacters,
}

/// Normalize one raw line, reporting why it was rejected.
pub fn normalize_line(raw: &str) -> Result<Host, Rejection> {
    if raw.starts_with('#') {
        return Err(Rejection::Empty);
    }

    let uncommented = match raw.find('#') {
        Some(idx) => &raw[..idx],
        None => raw,
    };

    let mut host = uncommented.trim().to_ascii_lowercase();
    if let Some(rest) = host.strip_prefix("www.") {
        host = rest.to_string();
    }
    if host.ends_with('.') {
        host.pop();
    }

    if host.is_empty() {
        return Err(Rejection::Empty);
    }
    if !host
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-')
    {
        return Err(Rejection::InvalidCharacters);
    }

    Ok(Host(host))
}

/// Normalize one raw line; `None` if it is blank, a comment, or malformed.
pub fn normalize(raw: &str) -> Option<Host> {
    normalize_line(raw).ok()
}

/// Result of normalizing a whole sequence of lines.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub hosts: Vec<Host>,
    /// Blank lines and comments
    pub empty: usize,
    /// Lines discarded for invalid characters
    pub rejected: usize,
}

impl Normalized {
    /// Total number of input lines seen.
    pub fn line_count(&self) -> usize {
        self.hosts.len() + self.empty + self.rejected
    }
}

/// Normalize every line, keeping order and counting what was dropped.
pub fn normalize_lines<I, S>(lines: I) -> Normalized
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Normalized::default();
    for line in lines {
        match normalize_line(line.as_ref()) {
            Ok(host) => out.hosts.push(host),
            Err(Rejection::Empty) => out.empty += 1,
            Err(Rejection::InvalidCharacters) => out.rejected += 1,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> Option<String> {
        normalize(s).map(Host::into_string)
    }

    #[test]
    fn test_lowercases() {
        assert_eq!(norm("Ads.Example.COM").as_deref(), Some("ads.example.com"));
        assert_eq!(normalize("Ads.Example.com"), normalize("ads.example.com"));
    }

    #[test]
    fn test_strips_single_www() {
        assert_eq!(norm("www.tracker.net").as_deref(), Some("tracker.net"));
        assert_eq!(norm("WWW.tracker.net").as_deref(), Some("tracker.net"));
        assert_eq!(norm("www.www.tracker.net").as_deref(), Some("www.tracker.net"));
    }

    #[test]
    fn test_www_only_inside_label_is_kept() {
        assert_eq!(norm("wwwads.net").as_deref(), Some("wwwads.net"));
        assert_eq!(norm("ads.www.net").as_deref(), Some("ads.www.net"));
    }

    #[test]
    fn test_strips_trailing_dot_once() {
        assert_eq!(norm("example.com.").as_deref(), Some("example.com"));
        assert_eq!(norm("example.com..").as_deref(), Some("example.com."));
    }

    #[test]
    fn test_comments_and_blanks() {
        assert_eq!(normalize_line("# comment"), Err(Rejection::Empty));
        assert_eq!(normalize_line(""), Err(Rejection::Empty));
        assert_eq!(normalize_line("   \t "), Err(Rejection::Empty));
        assert_eq!(normalize_line("   # indented comment"), Err(Rejection::Empty));
        assert_eq!(norm("ads.example.com # inline").as_deref(), Some("ads.example.com"));
        assert_eq!(norm("ads.example.com#tight").as_deref(), Some("ads.example.com"));
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(norm("  ads.example.com\t").as_deref(), Some("ads.example.com"));
        assert_eq!(norm("ads.example.com\r").as_deref(), Some("ads.example.com"));
    }

    #[test]
    fn test_rejects_invalid_characters() {
        assert_eq!(normalize_line("bad_host!.com"), Err(Rejection::InvalidCharacters));
        assert_eq!(normalize_line("under_score.com"), Err(Rejection::InvalidCharacters));
        assert_eq!(normalize_line("127.0.0.1 ads.com"), Err(Rejection::InvalidCharacters));
        assert_eq!(normalize_line("exämple.com"), Err(Rejection::InvalidCharacters));
        assert_eq!(normalize_line("*.example.com"), Err(Rejection::InvalidCharacters));
    }

    #[test]
    fn test_degenerate_inputs_are_empty() {
        assert_eq!(normalize_line("www."), Err(Rejection::Empty));
        assert_eq!(normalize_line("."), Err(Rejection::Empty));
    }

    #[test]
    fn test_normalize_lines_counts() {
        let lines = ["ads.example.com", "#comment", "", "tracker.net", "bad_host.com"];
        let out = normalize_lines(lines);
        assert_eq!(out.hosts.len(), 2);
        assert_eq!(out.empty, 2);
        assert_eq!(out.rejected, 1);
        assert_eq!(out.line_count(), 5);
    }

    #[test]
    fn test_from_str() {
        let host: Host = "WWW.Example.com.".parse().unwrap();
        assert_eq!(host.as_str(), "example.com");
        assert!("not valid!".parse::<Host>().is_err());
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let json = serde_json::to_string(&normalize("ads.example.com").unwrap()).unwrap();
        assert_eq!(json, "\"ads.example.com\"");
        let bad: Result<Host, _> = serde_json::from_str("\"bad host\"");
        assert!(bad.is_err());
    }
}
