//! Install pipeline
//!
//! `New -> Fetched -> Copied -> Migrated -> Updated`. Each step runs only when
//! the previous one succeeded; the first failure aborts the rest and is
//! returned unchanged. Nothing is retried.

use crate::action::ActionRunner;
use crate::fetch::{FetchContext, FetchStrategy};
use crate::paths::ExtensionPaths;
use extman_core::{Error, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Progress of one install attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum InstallState {
    New,
    Fetched,
    Copied,
    Migrated,
    Updated,
}

impl InstallState {
    /// Step that moves the pipeline out of this state
    fn next_step(self) -> &'static str {
        match self {
            Self::New => "fetch",
            Self::Fetched => "copy",
            Self::Copied => "migrate",
            Self::Migrated => "update",
            Self::Updated => "done",
        }
    }
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::New => "new",
            Self::Fetched => "fetched",
            Self::Copied => "copied",
            Self::Migrated => "migrated",
            Self::Updated => "updated",
        };
        f.write_str(s)
    }
}

/// Outcome of a successful install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub name: String,
    /// Install type tag of the strategy used
    pub install_type: &'static str,
    pub install_dir: PathBuf,
    /// States reached, in order
    pub states: Vec<InstallState>,
}

impl InstallReport {
    pub fn state(&self) -> InstallState {
        self.states.last().copied().unwrap_or(InstallState::New)
    }
}

/// Runs the install pipeline for one fetch strategy
pub struct Installer {
    fetch: FetchContext,
    actions: ActionRunner,
    paths: ExtensionPaths,
}

impl Installer {
    pub fn new(fetch: FetchContext, actions: ActionRunner, paths: ExtensionPaths) -> Self {
        Self {
            fetch,
            actions,
            paths,
        }
    }

    pub async fn install(&self, strategy: &FetchStrategy) -> Result<InstallReport> {
        let name = strategy.name();
        let mut report = InstallReport {
            name: name.to_string(),
            install_type: strategy.tag(),
            install_dir: self.paths.install_dir(name),
            states: vec![InstallState::New],
        };

        let result = self.run_steps(strategy, &mut report).await;
        if let Err(e) = &result {
            error!(
                "Install of {} failed at {} step: {}",
                name,
                report.state().next_step(),
                e
            );
        }
        result.map(|_| report)
    }

    async fn run_steps(&self, strategy: &FetchStrategy, report: &mut InstallReport) -> Result<()> {
        let name = strategy.name();

        let working = strategy.acquire(&self.fetch).await?;
        verify_working_path(&working)?;
        report.states.push(InstallState::Fetched);

        info!("Copying {} into {}", name, report.install_dir.display());
        copy_into_place(&working, &report.install_dir)?;
        remove_working_tree(&working);
        report.states.push(InstallState::Copied);

        self.actions.migrate(name).await?;
        report.states.push(InstallState::Migrated);

        self.actions.update(name).await?;
        report.states.push(InstallState::Updated);

        info!("Installed {}", name);
        Ok(())
    }
}

fn verify_working_path(working: &Path) -> Result<()> {
    if working.as_os_str().is_empty() {
        return Err(Error::fetch_failure("acquisition produced an empty path"));
    }
    if !working.is_dir() {
        return Err(Error::fetch_failure(format!(
            "acquired source {} does not exist",
            working.display()
        )));
    }
    Ok(())
}

/// Recursively copy `src` to `dest`, removing a partial `dest` on failure
pub fn copy_into_place(src: &Path, dest: &Path) -> Result<()> {
    if dest.exists() {
        return Err(Error::copy_failure(format!(
            "{} already exists",
            dest.display()
        )));
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            Error::copy_failure(format!("Cannot create {}: {}", parent.display(), e))
        })?;
    }

    copy_tree(src, dest).inspect_err(|_| {
        if let Err(e) = fs::remove_dir_all(dest) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove partial copy {}: {}", dest.display(), e);
            }
        }
    })
}

fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    let mut files = 0usize;
    for entry in WalkDir::new(src).follow_links(false) {
        let entry =
            entry.map_err(|e| Error::copy_failure(format!("Failed to walk directory: {}", e)))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::copy_failure(format!("Failed to compute relative path: {}", e)))?;
        let target = dest.join(rel);

        let copied = if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
        } else if entry.file_type().is_symlink() {
            copy_symlink(entry.path(), &target)
        } else {
            files += 1;
            fs::copy(entry.path(), &target).map(|_| ())
        };

        copied.map_err(|e| {
            Error::copy_failure(format!(
                "{} -> {}: {}",
                entry.path().display(),
                target.display(),
                e
            ))
        })?;
    }
    debug!("Copied {} files into {}", files, dest.display());
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(link)?, target)
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> std::io::Result<()> {
    fs::copy(link, target).map(|_| ())
}

fn remove_working_tree(working: &Path) {
    if let Err(e) = fs::remove_dir_all(working) {
        warn!(
            "Failed to remove temporary source {}: {}",
            working.display(),
            e
        );
    }
}
