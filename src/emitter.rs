//! Rendering of the final blocklist into resolver configuration files.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::TargetConfig;
use crate::error::HostfoldError;
use crate::fs_abstraction::FileSystem;
use crate::normalizer::Host;
use crate::reducer::LOOPBACK_HOST;

pub const HOST_PLACEHOLDER: &str = "%HOST%";
pub const FILE_PLACEHOLDER: &str = "%FILE%";
pub const DATE_PLACEHOLDER: &str = "%DATE%";

/// Header written when a target does not configure its own.
pub const DEFAULT_HEADER: &str = "# %FILE%\n\
# DNS blackhole configuration for advertising, tracking, and malware servers\n\
# Generated by hostfold\n\
# Generated at %DATE%\n\
\n";

/// One resolver output file.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTarget {
    pub name: String,
    pub path: PathBuf,
    pub header: String,
    pub template: String,
}

impl OutputTarget {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            header: DEFAULT_HEADER.to_string(),
            template: template.into(),
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Render the complete file contents.
    pub fn render(&self, hosts: &[Host], generated_at: NaiveDateTime) -> String {
        let file_name = display_name(&self.path);
        let date = generated_at.format("%Y-%m-%d %H:%M:%S").to_string();

        let mut out = self
            .header
            .replace(FILE_PLACEHOLDER, &file_name)
            .replace(DATE_PLACEHOLDER, &date);

        for host in hosts {
            if host.as_str() == LOOPBACK_HOST {
                continue;
            }
            out.push_str(&self.template.replace(HOST_PLACEHOLDER, host.as_str()));
            if !self.template.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }
}

impl From<&TargetConfig> for OutputTarget {
    fn from(config: &TargetConfig) -> Self {
        let target = OutputTarget::new(&config.name, &config.path, &config.template);
        match &config.header {
            Some(header) => target.with_header(header),
            None => target,
        }
    }
}

/// Write one target. Returns the number of host lines written.
pub fn emit(
    fs: &dyn FileSystem,
    target: &OutputTarget,
    hosts: &[Host],
    generated_at: NaiveDateTime,
) -> Result<usize, HostfoldError> {
    let contents = target.render(hosts, generated_at);
    fs.write_atomic(&target.path, contents.as_bytes())
        .map_err(|source| HostfoldError::Output {
            target: target.name.clone(),
            path: target.path.clone(),
            source,
        })?;

    let written = hosts.iter().filter(|h| h.as_str() != LOOPBACK_HOST).count();
    info!(
        "Wrote {} config {} ({} hosts)",
        target.name,
        display_name(&target.path),
        written
    );
    Ok(written)
}

/// Outcome of writing one target in [`emit_all`].
#[derive(Debug)]
pub struct EmitOutcome {
    pub target: String,
    pub path: PathBuf,
    pub result: Result<usize, HostfoldError>,
}

impl EmitOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Write every target independently; one failure does not stop the rest.
pub fn emit_all(
    fs: &dyn FileSystem,
    targets: &[OutputTarget],
    hosts: &[Host],
    generated_at: NaiveDateTime,
) -> Vec<EmitOutcome> {
    targets
        .iter()
        .map(|target| {
            let result = emit(fs, target, hosts, generated_at);
            if let Err(e) = &result {
                error!("{}", e);
            }
            EmitOutcome {
                target: target.name.clone(),
                path: target.path.clone(),
                result,
            }
        })
        .collect()
}

/// File name used in headers and log lines.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
