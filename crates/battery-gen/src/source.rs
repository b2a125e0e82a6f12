//! Resolution of the default skeleton and experiment repositories.

use std::path::{Path, PathBuf};
use std::process::Command;

use battery_core::errors::{BatteryError, ErrorInfo};
use tempfile::TempDir;

/// Subdirectory of a resolved source root holding the battery skeleton.
pub const BATTERY_SUBDIR: &str = "battery";
/// Subdirectory of a resolved source root holding the experiment modules.
pub const EXPERIMENTS_SUBDIR: &str = "experiments";

/// Local copies of the default sources.
///
/// When the copies were fetched into a temporary directory the guard keeps
/// it alive; dropping the value removes it.
#[derive(Debug)]
pub struct ResolvedSources {
    root: PathBuf,
    _guard: Option<TempDir>,
}

impl ResolvedSources {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            _guard: None,
        }
    }

    pub fn temporary(dir: TempDir) -> Self {
        Self {
            root: dir.path().to_path_buf(),
            _guard: Some(dir),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn battery_repo(&self) -> PathBuf {
        self.root.join(BATTERY_SUBDIR)
    }

    pub fn experiment_repo(&self) -> PathBuf {
        self.root.join(EXPERIMENTS_SUBDIR)
    }
}

/// Supplies default sources when the caller leaves one unspecified.
pub trait SourceResolver {
    fn resolve(&self) -> Result<ResolvedSources, BatteryError>;
}

/// Uses a directory that already contains `battery/` and `experiments/`.
#[derive(Debug, Clone)]
pub struct LocalSourceResolver {
    root: PathBuf,
}

impl LocalSourceResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceResolver for LocalSourceResolver {
    fn resolve(&self) -> Result<ResolvedSources, BatteryError> {
        if !self.root.is_dir() {
            return Err(BatteryError::Source(
                ErrorInfo::new("battery_gen.local_sources", "source directory does not exist")
                    .with_path(&self.root),
            ));
        }
        Ok(ResolvedSources::at(&self.root))
    }
}

/// Shallow-clones both repositories into a temporary directory.
#[derive(Debug, Clone)]
pub struct GitSourceResolver {
    pub battery_url: String,
    pub experiments_url: String,
}

impl GitSourceResolver {
    pub fn new(battery_url: impl Into<String>, experiments_url: impl Into<String>) -> Self {
        Self {
            battery_url: battery_url.into(),
            experiments_url: experiments_url.into(),
        }
    }

    fn clone_into(url: &str, dest: &Path) -> Result<(), BatteryError> {
        tracing::info!(url = %url, dest = %dest.display(), "cloning source repository");
        let output = Command::new("git")
            .args(["clone", "--depth", "1", "--quiet", url])
            .arg(dest)
            .output()
            .map_err(|err| {
                BatteryError::Source(
                    ErrorInfo::new("battery_gen.git_spawn", err.to_string())
                        .with_hint("is git installed and on PATH?"),
                )
            })?;
        if !output.status.success() {
            return Err(BatteryError::Source(
                ErrorInfo::new("battery_gen.git_clone", "git clone failed")
                    .with_context("url", url)
                    .with_context(
                        "stderr",
                        String::from_utf8_lossy(&output.stderr).trim().to_string(),
                    ),
            ));
        }
        Ok(())
    }
}

impl SourceResolver for GitSourceResolver {
    fn resolve(&self) -> Result<ResolvedSources, BatteryError> {
        let dir = tempfile::Builder::new()
            .prefix("battery-sources-")
            .tempdir()
            .map_err(|err| {
                BatteryError::Source(ErrorInfo::new("battery_gen.source_tempdir", err.to_string()))
            })?;
        Self::clone_into(&self.battery_url, &dir.path().join(BATTERY_SUBDIR))?;
        Self::clone_into(&self.experiments_url, &dir.path().join(EXPERIMENTS_SUBDIR))?;
        Ok(ResolvedSources::temporary(dir))
    }
}

/// Resolver for callers that always pass both sources explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSourceResolver;

impl SourceResolver for NoSourceResolver {
    fn resolve(&self) -> Result<ResolvedSources, BatteryError> {
        Err(BatteryError::Source(
            ErrorInfo::new("battery_gen.no_resolver", "no default source configured")
                .with_hint("pass both repositories, or configure a local or git source"),
        ))
    }
}
