//! Install/uninstall policy
//!
//! [`ExtensionManager`] is the entry point used by the CLI. It normalises the
//! requested name, skips work that is already done, serialises operations on
//! the same name and hands the rest to the [`Installer`] or [`Uninstaller`].

use crate::action::ActionRunner;
use crate::fetch::{FetchContext, StrategySelector};
use crate::installer::{InstallReport, Installer};
use crate::lock::ExtensionLock;
use crate::paths::ExtensionPaths;
use crate::registry::ExtensionCatalog;
use crate::runner::CommandRunner;
use crate::uninstaller::{UninstallReport, Uninstaller};
use extman_core::{is_valid_extension_name, to_extension_name, Error, ExtmanConfig, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed(InstallReport),
    /// Nothing was done; the extension was found at `path`
    AlreadyInstalled { name: String, path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    Uninstalled(UninstallReport),
    /// Nothing was done
    NotInstalled { name: String },
}

pub struct ExtensionManager {
    catalog: Arc<dyn ExtensionCatalog>,
    selector: StrategySelector,
    paths: ExtensionPaths,
    lock_root: PathBuf,
    installer: Installer,
    uninstaller: Uninstaller,
}

impl ExtensionManager {
    pub fn new(
        config: &ExtmanConfig,
        catalog: Arc<dyn ExtensionCatalog>,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self> {
        let paths = ExtensionPaths::from_config(config);
        let actions = ActionRunner::new(config, runner.clone());
        let fetch = FetchContext::new(config, runner)?;

        Ok(Self {
            catalog,
            selector: StrategySelector::default(),
            installer: Installer::new(fetch, actions.clone(), paths.clone()),
            uninstaller: Uninstaller::new(actions, paths.clone()),
            paths,
            lock_root: config.work_dir.clone(),
        })
    }

    /// Replace the default install type table
    pub fn with_selector(mut self, selector: StrategySelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn paths(&self) -> &ExtensionPaths {
        &self.paths
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.paths.is_installed(&to_extension_name(name))
    }

    /// Install `name` unless it is already installed
    pub async fn install(&self, name: &str) -> Result<InstallOutcome> {
        let name = normalise(name, "install")?;
        if let Some(path) = self.paths.locate(&name) {
            return Ok(InstallOutcome::AlreadyInstalled { name, path });
        }

        let _lock = ExtensionLock::acquire(&self.lock_root, &name)?;
        // Another process may have finished while we waited for the lock.
        if let Some(path) = self.paths.locate(&name) {
            return Ok(InstallOutcome::AlreadyInstalled { name, path });
        }

        let record = self.catalog.find_by_name(&name).await?;
        let strategy = self.selector.select(&record)?;
        debug!("Installing {} with {:?}", name, strategy);

        let report = self.installer.install(&strategy).await?;
        Ok(InstallOutcome::Installed(report))
    }

    /// Uninstall `name` if it is installed
    pub async fn uninstall(&self, name: &str) -> Result<UninstallOutcome> {
        let name = normalise(name, "uninstall")?;
        if !self.paths.is_installed(&name) {
            return Ok(UninstallOutcome::NotInstalled { name });
        }

        let _lock = ExtensionLock::acquire(&self.lock_root, &name)?;
        if !self.paths.is_installed(&name) {
            return Ok(UninstallOutcome::NotInstalled { name });
        }

        // The installed directory is authoritative; the record is informational.
        match self.catalog.find_by_name(&name).await {
            Ok(record) => debug!("Registry record for {}: {:?}", name, record),
            Err(e @ (Error::ExtensionNotFound { .. } | Error::Registry { .. })) => {
                warn!("Uninstalling {} without a registry record: {}", name, e)
            }
            Err(e) => return Err(e),
        }

        let report = self.uninstaller.uninstall(&name).await?;
        Ok(UninstallOutcome::Uninstalled(report))
    }
}

fn normalise(raw: &str, command: &str) -> Result<String> {
    let name = to_extension_name(raw);
    if name.is_empty() {
        return Err(Error::missing_argument(format!(
            "You must specify an extension to {}.",
            command
        )));
    }
    if !is_valid_extension_name(&name) {
        return Err(Error::invalid_name(raw.trim()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise() {
        assert_eq!(normalise("PageAttachments", "install").unwrap(), "page_attachments");
        assert_eq!(normalise("my-ext", "install").unwrap(), "my_ext");
        assert!(matches!(
            normalise("  ", "uninstall"),
            Err(Error::MissingArgument { ref message }) if message.ends_with("uninstall.")
        ));
    }

    #[test]
    fn test_normalise_rejects_path_components() {
        for raw in ["../escaped", "..", "a/b", "a\\b", "my.ext", "/etc"] {
            assert!(
                matches!(normalise(raw, "install"), Err(Error::InvalidName { .. })),
                "accepted {raw}"
            );
        }
    }
}
