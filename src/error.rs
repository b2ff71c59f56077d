//! Error types for hostfold.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostfoldError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch error for feed '{feed}': {reason}")]
    Fetch { feed: String, reason: String },

    #[error("Invalid host: {0}")]
    InvalidHost(String),

    #[error("Extraction error for feed '{feed}': {reason}")]
    Extraction { feed: String, reason: String },

    #[error("Failed to write target '{target}' to {path:?}: {source}")]
    Output {
        target: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("File system error on {path:?}: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Another hostfold run holds the lock file {0:?}")]
    Locked(PathBuf),
}

impl HostfoldError {
    pub(crate) fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }
}
