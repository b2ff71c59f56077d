//! HTTP fetcher for downloading and caching hosts feeds.

use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

use crate::aggregator::FeedLines;
use crate::config::{Config, FeedConfig};
use crate::error::HostfoldError;
use crate::extract::Extractor;
use crate::fs_abstraction::FileSystem;
use crate::utils::format_count;

const RETRY_DELAY_MS: u64 = 2000;

/// Maximum size per feed body (20 MB)
const MAX_FEED_SIZE: usize = 20 * 1024 * 1024;

/// Maximum concurrent HTTP requests to feed servers
const MAX_CONCURRENT_REQUESTS: usize = 4;

/// How cached copies are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Reuse a cached copy younger than the fetch interval
    #[default]
    Normal,
    /// Always download
    Force,
    /// Never touch the network
    Offline,
}

/// Where a feed's lines came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOrigin {
    Network,
    Cache,
    /// Download failed and an out-of-date cached copy was used
    StaleCache,
}

impl FeedOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedOrigin::Network => "downloaded",
            FeedOrigin::Cache => "cached",
            FeedOrigin::StaleCache => "stale cache",
        }
    }
}

/// Lines extracted from one feed.
#[derive(Debug, Clone)]
pub struct LoadedFeed {
    pub lines: FeedLines,
    pub origin: FeedOrigin,
}

/// Result of loading one feed in [`Fetcher::load_feeds`].
#[derive(Debug)]
pub struct FeedOutcome {
    pub name: String,
    pub result: Result<LoadedFeed, HostfoldError>,
}

/// Downloads feeds, maintains the on-disk cache and extracts host lines.
pub struct Fetcher {
    client: Client,
    attempts: u32,
    retry_delay: Duration,
    interval: Duration,
    data_dir: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl Fetcher {
    pub fn new(config: &Config, fs: Arc<dyn FileSystem>) -> Result<Self, HostfoldError> {
        let client = Client::builder()
            .timeout(config.fetch.timeout())
            .user_agent(format!("hostfold/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HostfoldError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            attempts: config.fetch.attempts.max(1),
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
            interval: config.fetch.interval(),
            data_dir: config.data_dir.clone(),
            fs,
        })
    }

    /// Base delay before the first retry; doubles on each further attempt.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn cache_path(&self, feed: &FeedConfig) -> PathBuf {
        self.data_dir.join(&feed.file)
    }

    /// Whether the cached copy of `feed` is younger than the fetch interval.
    pub fn is_fresh(&self, feed: &FeedConfig) -> bool {
        self.fs
            .modified(&self.cache_path(feed))
            .ok()
            .and_then(|mtime| SystemTime::now().duration_since(mtime).ok())
            .map(|age| age < self.interval)
            .unwrap_or(false)
    }

    /// Load one feed, downloading it unless a usable cached copy exists.
    pub async fn load_feed(
        &self,
        feed: &FeedConfig,
        mode: FetchMode,
    ) -> Result<LoadedFeed, HostfoldError> {
        let extractor = Extractor::from_feed(feed)?;

        let (body, origin) = match mode {
            FetchMode::Offline => (self.read_cache(feed)?, FeedOrigin::Cache),
            FetchMode::Normal if self.is_fresh(feed) => {
                debug!("Using cached copy of {}", feed.name);
                (self.read_cache(feed)?, FeedOrigin::Cache)
            }
            _ => match self.download(feed, &extractor).await {
                Ok(body) => {
                    if let Err(e) = self.write_cache(feed, &body) {
                        warn!("Could not cache {}: {}", feed.name, e);
                    }
                    (body, FeedOrigin::Network)
                }
                Err(e) => match self.read_cache(feed) {
                    Ok(body) => {
                        warn!("{}; falling back to cached copy", e);
                        (body, FeedOrigin::StaleCache)
                    }
                    Err(_) => return Err(e),
                },
            },
        };

        let lines = extractor.extract(&body)?;
        info!(
            "Loaded {} ({}) - {} lines",
            feed.name,
            origin.as_str(),
            format_count(lines.len())
        );
        Ok(LoadedFeed {
            lines: FeedLines::new(&feed.name, lines),
            origin,
        })
    }

    /// Load several feeds concurrently with limited parallelism.
    pub async fn load_feeds(&self, feeds: &[&FeedConfig], mode: FetchMode) -> Vec<FeedOutcome> {
        stream::iter(feeds.iter().map(|feed| async move {
            FeedOutcome {
                name: feed.name.clone(),
                result: self.load_feed(feed, mode).await,
            }
        }))
        .buffer_unordered(MAX_CONCURRENT_REQUESTS)
        .collect()
        .await
    }

    fn read_cache(&self, feed: &FeedConfig) -> Result<String, HostfoldError> {
        let path = self.cache_path(feed);
        self.fs.read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => HostfoldError::Fetch {
                feed: feed.name.clone(),
                reason: format!("no cached copy at {}", path.display()),
            },
            _ => HostfoldError::fs(&path, e),
        })
    }

    fn write_cache(&self, feed: &FeedConfig, body: &str) -> Result<(), HostfoldError> {
        self.fs
            .create_dir_all(&self.data_dir)
            .map_err(|e| HostfoldError::fs(&self.data_dir, e))?;
        let path = self.cache_path(feed);
        self.fs
            .write_atomic(&path, body.as_bytes())
            .map_err(|e| HostfoldError::fs(&path, e))
    }

    /// Download with retry, accepting only bodies that pass the feed's checks.
    async fn download(&self, feed: &FeedConfig, extractor: &Extractor) -> Result<String, HostfoldError> {
        let mut last_error = None;

        for attempt in 0..self.attempts {
            if attempt > 0 {
                let delay = self.retry_delay * (1 << (attempt - 1).min(4));
                debug!("Retry {} after {:?} for {}", attempt, delay, feed.name);
                tokio::time::sleep(delay).await;
            }

            info!("Fetching {}...", feed.name);
            match self.fetch_once(feed).await {
                Ok(body) => match extractor.check(&body) {
                    Ok(()) => return Ok(body),
                    Err(e) => {
                        warn!("{}", e);
                        last_error = Some(e);
                    }
                },
                Err(e) => {
                    debug!("{}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| HostfoldError::Fetch {
            feed: feed.name.clone(),
            reason: "no attempts made".to_string(),
        }))
    }

    async fn fetch_once(&self, feed: &FeedConfig) -> Result<String, HostfoldError> {
        let fail = |reason: String| HostfoldError::Fetch {
            feed: feed.name.clone(),
            reason,
        };

        let response = self
            .client
            .get(&feed.url)
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fail(format!("HTTP {}", response.status())));
        }
        if let Some(content_length) = response.content_length() {
            if content_length as usize > MAX_FEED_SIZE {
                return Err(fail(format!(
                    "response too large: {} bytes (max: {} bytes)",
                    content_length, MAX_FEED_SIZE
                )));
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| fail(format!("failed to read response body: {}", e)))?;
        if body.len() > MAX_FEED_SIZE {
            return Err(fail(format!(
                "downloaded content too large: {} bytes (max: {} bytes)",
                body.len(),
                MAX_FEED_SIZE
            )));
        }
        Ok(body)
    }
}
