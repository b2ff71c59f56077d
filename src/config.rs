//! Configuration management for hostfold.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{default_multipart_suffixes, DomainClassifier};
use crate::error::HostfoldError;
use crate::validation::{
    compile_pattern, parse_interval, validate_suffix, validate_template,
};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory for feed caches, run state and the lock file
    pub data_dir: PathBuf,

    /// Locally curated lists
    pub lists: ListPaths,

    /// Two-label suffixes (co.uk, com.au, ...) that need three labels for
    /// a registrable domain
    pub multipart_tld_suffixes: Vec<String>,

    /// Fetch and cache policy
    pub fetch: FetchSettings,

    /// Remote feeds
    pub feeds: Vec<FeedConfig>,

    /// Resolver configuration files to write
    pub targets: Vec<TargetConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            lists: ListPaths::default(),
            multipart_tld_suffixes: default_multipart_suffixes(),
            fetch: FetchSettings::default(),
            feeds: Vec::new(),
            targets: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to load config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config =
            serde_yaml::from_str(content).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), HostfoldError> {
        self.fetch.validate()?;

        for suffix in &self.multipart_tld_suffixes {
            validate_suffix(suffix).map_err(HostfoldError::Config)?;
        }

        let mut feed_names = HashSet::new();
        let mut feed_files = HashSet::new();
        for feed in &self.feeds {
            feed.validate()?;
            if !feed_names.insert(feed.name.as_str()) {
                return Err(HostfoldError::Config(format!(
                    "Duplicate feed name '{}'",
                    feed.name
                )));
            }
            if !feed_files.insert(feed.file.as_path()) {
                return Err(HostfoldError::Config(format!(
                    "Feed '{}' reuses cache file {:?}",
                    feed.name, feed.file
                )));
            }
        }

        let mut target_names = HashSet::new();
        for target in &self.targets {
            target.validate()?;
            if !target_names.insert(target.name.as_str()) {
                return Err(HostfoldError::Config(format!(
                    "Duplicate target name '{}'",
                    target.name
                )));
            }
        }

        Ok(())
    }

    /// Save configuration to YAML file atomically
    ///
    /// Uses tempfile + rename pattern to prevent corruption on crash.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let path = path.as_ref();
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        let parent_dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut temp_file = NamedTempFile::new_in(parent_dir)
            .context("Failed to create temporary file for config")?;

        temp_file.write_all(content.as_bytes())?;
        temp_file.as_file().sync_all()?;

        temp_file
            .persist(path)
            .with_context(|| format!("Failed to persist config file: {:?}", path))?;

        Ok(())
    }

    /// Feeds with `enabled: true`
    pub fn enabled_feeds(&self) -> Vec<&FeedConfig> {
        self.feeds.iter().filter(|f| f.enabled).collect()
    }

    /// Targets with `enabled: true`
    pub fn enabled_targets(&self) -> Vec<&TargetConfig> {
        self.targets.iter().filter(|t| t.enabled).collect()
    }

    /// Domain classifier built from the configured suffix list
    pub fn classifier(&self) -> DomainClassifier {
        DomainClassifier::new(&self.multipart_tld_suffixes)
    }

    /// Path of the persisted run state
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join("state.json")
    }

    /// Generate default config with comments
    pub fn generate_default_yaml() -> String {
        include_str!("../templates/config.yaml").to_string()
    }
}

/// Locations of the locally curated lists
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListPaths {
    /// Hosts that must never be blocked
    pub whitelist: PathBuf,
    /// Hosts to block in addition to the feeds
    pub blacklist: PathBuf,
    /// Bundled baseline list, merged like the blacklist
    pub baseline: Option<PathBuf>,
}

impl Default for ListPaths {
    fn default() -> Self {
        Self {
            whitelist: PathBuf::from("./personal-whitelist.txt"),
            blacklist: PathBuf::from("./personal-blacklist.txt"),
            baseline: Some(PathBuf::from("./data/hosts-baseline.txt")),
        }
    }
}

/// Fetch and cache policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Reuse a cached feed younger than this (e.g. "12h", "1d")
    pub interval: String,
    /// Download attempts per feed
    pub attempts: u32,
    /// HTTP timeout per attempt
    pub timeout_secs: u64,
    /// Abort the update when any feed fails
    pub failure_fatal: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            interval: "1d".to_string(),
            attempts: 3,
            timeout_secs: 30,
            failure_fatal: false,
        }
    }
}

impl FetchSettings {
    pub fn validate(&self) -> Result<(), HostfoldError> {
        if parse_interval(&self.interval).is_none() {
            return Err(HostfoldError::Config(format!(
                "Invalid fetch.interval '{}'. Use format like '30m', '12h', '1d'",
                self.interval
            )));
        }
        if self.attempts == 0 {
            return Err(HostfoldError::Config(
                "fetch.attempts must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(HostfoldError::Config(
                "fetch.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Cache freshness interval; falls back to one day if unparsable
    pub fn interval(&self) -> Duration {
        parse_interval(&self.interval).unwrap_or(Duration::from_secs(86400))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_true() -> bool {
    true
}

/// A remote hosts/domain feed and the rules for extracting hosts from it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
    /// Cache file name inside `data_dir`
    pub file: PathBuf,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Regex marking the start of the relevant section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_delimiter: Option<String>,
    /// Regex marking the end of the relevant section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_delimiter: Option<String>,
    /// Responses shorter than this are treated as failures
    #[serde(default)]
    pub min_bytes: usize,
    /// Regex that must match somewhere in a valid response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_text: Option<String>,
    /// Multi-line regexes whose matches are deleted (e.g. `^127\.0\.0\.1\s+`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replace_patterns: Vec<String>,
    /// If set, only the first capture group of each match is kept
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_all_pattern: Option<String>,
}

impl FeedConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            file: file.into(),
            enabled: true,
            start_delimiter: None,
            end_delimiter: None,
            min_bytes: 0,
            validation_text: None,
            replace_patterns: Vec::new(),
            match_all_pattern: None,
        }
    }

    pub fn validate(&self) -> Result<(), HostfoldError> {
        let fail = |reason: String| {
            Err(HostfoldError::Config(format!(
                "Feed '{}': {}",
                self.name, reason
            )))
        };

        if self.name.trim().is_empty() {
            return Err(HostfoldError::Config("Feed name cannot be empty".to_string()));
        }
        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return fail(format!("URL must use http:// or https://: {}", self.url));
        }
        let file_ok = self.file.file_name().is_some()
            && self.file.components().count() == 1
            && !self.file.is_absolute();
        if !file_ok {
            return fail(format!(
                "cache file must be a plain file name, got {:?}",
                self.file
            ));
        }

        for pattern in [&self.start_delimiter, &self.end_delimiter, &self.validation_text]
            .into_iter()
            .flatten()
        {
            if let Err(e) = compile_pattern("si", pattern) {
                return fail(e);
            }
        }
        for pattern in &self.replace_patterns {
            if let Err(e) = compile_pattern("m", pattern) {
                return fail(e);
            }
        }
        if let Some(pattern) = &self.match_all_pattern {
            match compile_pattern("m", pattern) {
                Ok(re) if re.captures_len() < 2 => {
                    return fail(format!(
                        "match_all_pattern '{}' needs a capture group",
                        pattern
                    ))
                }
                Ok(_) => {}
                Err(e) => return fail(e),
            }
        }
        Ok(())
    }
}

/// A resolver configuration file produced from the final blocklist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetConfig {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    pub path: PathBuf,
    /// Per-host line; `%HOST%` is replaced with the host name
    pub template: String,
    /// File header; `%FILE%` and `%DATE%` are substituted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

impl TargetConfig {
    pub fn validate(&self) -> Result<(), HostfoldError> {
        if self.name.trim().is_empty() {
            return Err(HostfoldError::Config("Target name cannot be empty".to_string()));
        }
        if self.path.as_os_str().is_empty() {
            return Err(HostfoldError::Config(format!(
                "Target '{}' has an empty path",
                self.name
            )));
        }
        validate_template(&self.template)
            .map_err(|e| HostfoldError::Config(format!("Target '{}': {}", self.name, e)))
    }
}
