//! # hostfold - Hosts Blocklist Consolidator
//!
//! Merges several community hosts feeds (ads, trackers, malware) with a
//! personal blacklist and whitelist, collapses hosts under fully blocked
//! domains, and writes the result as DNS resolver configuration (BIND,
//! Unbound, NSD, dnsmasq, PowerDNS Recursor).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        hostfold                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: init, update, check, domains, stats        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                        │
//! │    └── Feeds, targets, lists, multi-part suffixes           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Fetcher (reqwest + rustls) + Extractor (regex)             │
//! │    └── Cached downloads, delimiters, replace patterns       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Pipeline                                                   │
//! │    ├── Normalizer -> Aggregator                             │
//! │    ├── Domain classifier -> Apex collector                  │
//! │    └── Reducer                                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Emitter                                                    │
//! │    └── Header + per-host template, atomic writes            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use hostfold::aggregator::FeedLines;
//! use hostfold::domain::DomainClassifier;
//! use hostfold::pipeline::{consolidate, LocalLists};
//!
//! let feeds = vec![FeedLines::new(
//!     "A",
//!     vec!["ads.example.com".into(), "#comment".into(), "".into(), "tracker.net".into()],
//! )];
//! let lists = LocalLists {
//!     whitelist: vec!["tracker.net".into()],
//!     blacklist: vec!["evil.co.uk".into()],
//! };
//! let result = consolidate(&feeds, &lists, &DomainClassifier::default());
//! let hosts: Vec<&str> = result.hosts.iter().map(|h| h.as_str()).collect();
//! assert_eq!(hosts, vec!["ads.example.com", "evil.co.uk"]);
//! ```
//!
//! ## Modules
//!
//! - [`aggregator`] - Union of normalized feed and blacklist hosts
//! - [`apex`] - Registrable domains blocked as a whole
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`domain`] - Registrable-domain classification with multi-part suffixes
//! - [`emitter`] - Resolver configuration rendering
//! - [`error`] - Error types
//! - [`extract`] - Host line extraction from raw feed bodies
//! - [`fetcher`] - HTTP client and feed cache
//! - [`fs_abstraction`] - Mockable filesystem access
//! - [`lock`] - File locking for concurrent execution prevention
//! - [`normalizer`] - Raw line to canonical host
//! - [`pipeline`] - End-to-end consolidation
//! - [`reducer`] - Final blocklist reduction
//! - [`stats`] - State persistence and statistics
//! - [`utils`] - Common utility functions (formatting, truncation)
//! - [`validation`] - Config value validation

pub mod aggregator;
pub mod apex;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod emitter;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod fs_abstraction;
pub mod lock;
pub mod normalizer;
pub mod pipeline;
pub mod reducer;
pub mod stats;
pub mod utils;
pub mod validation;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::HostfoldError;
pub use normalizer::Host;
