use super::{remove_stale, FetchContext};
use crate::runner::CommandSpec;
use extman_core::Result;
use std::path::PathBuf;
use tracing::info;

/// Supported version control systems
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vcs {
    Git,
    Subversion,
}

impl Vcs {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Git => "Git",
            Self::Subversion => "Subversion",
        }
    }

    fn program(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Subversion => "svn",
        }
    }

    fn subcommand(self) -> &'static str {
        match self {
            Self::Git => "clone",
            Self::Subversion => "checkout",
        }
    }
}

/// Version control checkout of a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub vcs: Vcs,
    pub url: String,
    pub name: String,
}

impl Checkout {
    pub fn new(vcs: Vcs, url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            vcs,
            url: url.into(),
            name: name.into(),
        }
    }

    pub fn git(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(Vcs::Git, url, name)
    }

    pub fn subversion(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(Vcs::Subversion, url, name)
    }

    /// `<program> <subcommand> <url> <name>`, run in the work dir
    pub fn command(&self) -> CommandSpec {
        CommandSpec::new(self.vcs.program())
            .arg(self.vcs.subcommand())
            .arg(&self.url)
            .arg(&self.name)
    }

    /// Check out into `<work-dir>/<name>`
    pub async fn checkout(&self, ctx: &FetchContext) -> Result<PathBuf> {
        ctx.ensure_work_dir()?;
        let dest = ctx.work_dir.join(&self.name);
        remove_stale(&dest)?;

        info!("Checking out {} from {}", self.name, self.url);
        ctx.run_tool(self.command()).await?;
        Ok(dest)
    }
}
