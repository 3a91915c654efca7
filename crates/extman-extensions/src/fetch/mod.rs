//! Fetch strategies
//!
//! A [`FetchStrategy`] brings an extension's source onto local disk and
//! returns the directory holding it. Two families exist:
//!
//! - [`Checkout`]: version control clone (Git, Subversion)
//! - [`Download`]: archive download followed by a format-specific unpack
//!   (Gem, Tarball, Zip)
//!
//! Output parsing lives in [`unpack`] and is free of I/O.

mod checkout;
mod download;
mod selector;
pub mod unpack;

pub use checkout::{Checkout, Vcs};
pub use download::{ArchiveFormat, Download};
pub use selector::{is_git_url, StrategyConstructor, StrategySelector, UrlMatcher};

use crate::runner::{CommandOutput, CommandRunner, CommandSpec};
use extman_core::{Error, ExtmanConfig, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Shared collaborators for an acquisition
#[derive(Clone)]
pub struct FetchContext {
    /// Scratch directory checkouts and downloads land in
    pub work_dir: PathBuf,
    pub command_timeout: Duration,
    pub download_timeout: Duration,
    pub runner: Arc<dyn CommandRunner>,
    pub http: reqwest::Client,
}

impl FetchContext {
    pub fn new(config: &ExtmanConfig, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("extman/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::fetch_failure(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            work_dir: config.work_dir.clone(),
            command_timeout: Duration::from_secs(config.timeouts.command_secs),
            download_timeout: Duration::from_secs(config.timeouts.download_secs),
            runner,
            http,
        })
    }

    /// Run an acquisition tool inside the work dir
    ///
    /// Spawn failures, timeouts and non-zero exits all become `FetchFailure`.
    pub(crate) async fn run_tool(&self, spec: CommandSpec) -> Result<CommandOutput> {
        let spec = spec
            .current_dir(&self.work_dir)
            .timeout(self.command_timeout);

        let output = self.runner.run(&spec).await.map_err(|e| match e {
            Error::Io(io) => Error::fetch_failure(format!("'{}': {}", spec, io)),
            other => other,
        })?;

        if !output.success() {
            return Err(Error::fetch_failure(format!(
                "'{}' exited with {}: {}",
                spec,
                output.code,
                output.diagnostic()
            )));
        }
        Ok(output)
    }

    pub(crate) fn ensure_work_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.work_dir).map_err(|e| {
            Error::fetch_failure(format!(
                "Cannot create work directory {}: {}",
                self.work_dir.display(),
                e
            ))
        })
    }
}

/// How an extension's source is acquired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStrategy {
    Checkout(Checkout),
    Download(Download),
}

impl FetchStrategy {
    /// Extension name the source is fetched for
    pub fn name(&self) -> &str {
        match self {
            Self::Checkout(c) => &c.name,
            Self::Download(d) => &d.name,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Checkout(c) => &c.url,
            Self::Download(d) => &d.url,
        }
    }

    /// Install type tag of this variant
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Checkout(c) => c.vcs.tag(),
            Self::Download(d) => d.format.tag(),
        }
    }

    /// Acquire the source and return the directory holding it
    pub async fn acquire(&self, ctx: &FetchContext) -> Result<PathBuf> {
        debug!("Acquiring {} via {} from {}", self.name(), self.tag(), self.url());
        match self {
            Self::Checkout(c) => c.checkout(ctx).await,
            Self::Download(d) => d.acquire(ctx).await,
        }
    }
}

fn remove_stale(path: &Path) -> Result<()> {
    let removed = if path.is_dir() {
        debug!("Removing stale {}", path.display());
        std::fs::remove_dir_all(path)
    } else if path.exists() {
        std::fs::remove_file(path)
    } else {
        Ok(())
    };
    removed.map_err(|e| Error::fetch_failure(format!("Cannot clear {}: {}", path.display(), e)))
}
