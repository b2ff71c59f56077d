//! Init command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::fs_abstraction::{real_fs, FileSystem};

const STARTER_WHITELIST: &str = include_str!("../../skel/personal-whitelist.txt");
const STARTER_BLACKLIST: &str = include_str!("../../skel/personal-blacklist.txt");
const BASELINE: &str = include_str!("../../skel/hosts-baseline.txt");

/// Run the init command
pub async fn run(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        anyhow::bail!(
            "Config file {:?} already exists; remove it first to start over",
            config_path
        );
    }

    let yaml = Config::generate_default_yaml();
    let config = Config::from_yaml(&yaml).context("Bundled default config is invalid")?;

    let fs = real_fs();
    write_new(fs, config_path, &yaml)?;
    info!("Created config {:?}", config_path);

    fs.create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", config.data_dir))?;

    write_new(fs, &config.lists.whitelist, STARTER_WHITELIST)?;
    write_new(fs, &config.lists.blacklist, STARTER_BLACKLIST)?;
    if let Some(baseline) = &config.lists.baseline {
        write_new(fs, baseline, BASELINE)?;
    }

    println!();
    println!("[OK] hostfold initialized. Edit {:?}, then run `hostfold update`.", config_path);

    Ok(())
}

/// Write `contents` unless the file already exists.
fn write_new(fs: &dyn FileSystem, path: &Path, contents: &str) -> Result<()> {
    if fs.exists(path) {
        info!("Keeping existing {:?}", path);
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs.create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    fs.write_atomic(path, contents.as_bytes())
        .with_context(|| format!("Failed to write {:?}", path))
}
