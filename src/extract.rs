//! Extraction of candidate host lines from a raw feed body.
//!
//! Each feed describes how to find its hosts: an optional section between two
//! delimiters, decoration to delete (`127.0.0.1 ` prefixes and the like), and
//! optionally a pattern whose first capture group is the host. What comes out
//! is a plain sequence of lines for the normalizer.

use regex::Regex;

use crate::config::FeedConfig;
use crate::error::HostfoldError;
use crate::validation::compile_pattern;

/// Compiled extraction and sanity-check rules for one feed.
#[derive(Debug, Clone)]
pub struct Extractor {
    feed: String,
    section: Option<Regex>,
    replacements: Vec<Regex>,
    match_all: Option<Regex>,
    validation: Option<Regex>,
    min_bytes: usize,
}

impl Extractor {
    pub fn from_feed(feed: &FeedConfig) -> Result<Self, HostfoldError> {
        let compile = |flags: &str, pattern: &str| {
            compile_pattern(flags, pattern).map_err(|reason| HostfoldError::Extraction {
                feed: feed.name.clone(),
                reason,
            })
        };

        let section = match (&feed.start_delimiter, &feed.end_delimiter) {
            (None, None) => None,
            (start, end) => {
                let start = start.as_deref().unwrap_or("");
                let end = end.as_deref().unwrap_or(r"\z");
                Some(compile("si", &format!("{}(.*?){}", start, end))?)
            }
        };

        let replacements = feed
            .replace_patterns
            .iter()
            .map(|p| compile("m", p.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        let match_all = feed
            .match_all_pattern
            .as_deref()
            .map(|p| compile("m", p))
            .transpose()?;

        let validation = feed
            .validation_text
            .as_deref()
            .map(|p| compile("si", p))
            .transpose()?;

        Ok(Self {
            feed: feed.name.clone(),
            section,
            replacements,
            match_all,
            validation,
            min_bytes: feed.min_bytes,
        })
    }

    /// Reject responses that are too short or lack the validation text.
    pub fn check(&self, body: &str) -> Result<(), HostfoldError> {
        if body.len() < self.min_bytes {
            return Err(HostfoldError::Fetch {
                feed: self.feed.clone(),
                reason: format!(
                    "response was only {} bytes, expected at least {}",
                    body.len(),
                    self.min_bytes
                ),
            });
        }
        if let Some(re) = &self.validation {
            if !re.is_match(body) {
                return Err(HostfoldError::Fetch {
                    feed: self.feed.clone(),
                    reason: format!("response is missing validation text /{}/", re.as_str()),
                });
            }
        }
        Ok(())
    }

    /// Slice, scrub and split a feed body into raw candidate lines.
    pub fn extract(&self, body: &str) -> Result<Vec<String>, HostfoldError> {
        let mut text = body.replace("\r\n", "\n");

        if let Some(section) = &self.section {
            let captured = section
                .captures(&text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .ok_or_else(|| HostfoldError::Extraction {
                    feed: self.feed.clone(),
                    reason: "list delimiters not found".to_string(),
                })?;
            text = captured;
        }

        for re in &self.replacements {
            text = re.replace_all(&text, "").into_owned();
        }

        let lines = match &self.match_all {
            Some(re) => re
                .captures_iter(&text)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .collect(),
            None => text.lines().map(str::to_string).collect(),
        };

        Ok(lines)
    }
}
