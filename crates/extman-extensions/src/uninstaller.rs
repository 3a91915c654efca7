//! Uninstall pipeline
//!
//! Migrations are rolled back before the extension directory is removed.
//! Removing the code first would leave nothing to run the down-migration with,
//! so a failed rollback aborts with the directory untouched.

use crate::action::ActionRunner;
use crate::paths::ExtensionPaths;
use extman_core::{Error, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// Outcome of a successful uninstall
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallReport {
    pub name: String,
    pub removed_dir: PathBuf,
}

pub struct Uninstaller {
    actions: ActionRunner,
    paths: ExtensionPaths,
}

impl Uninstaller {
    pub fn new(actions: ActionRunner, paths: ExtensionPaths) -> Self {
        Self { actions, paths }
    }

    pub async fn uninstall(&self, name: &str) -> Result<UninstallReport> {
        let dir = self.paths.install_dir(name);

        if !self.paths.is_installed_locally(name) {
            let (path, reason) = match self.paths.locate(name) {
                Some(found) => (found, "installed under a read-only extensions root"),
                None => (dir, "not installed"),
            };
            return Err(Error::remove_failure(path.display().to_string(), reason));
        }

        self.actions.migrate_down(name).await?;

        info!("Removing {}", dir.display());
        std::fs::remove_dir_all(&dir)
            .map_err(|e| Error::remove_failure(dir.display().to_string(), e.to_string()))?;

        self.cleanup_environment(name);

        info!("Uninstalled {}", name);
        Ok(UninstallReport {
            name: name.to_string(),
            removed_dir: dir,
        })
    }

    /// Reserved for dropping references to the extension from application
    /// configuration. No such configuration is maintained, so this does nothing.
    fn cleanup_environment(&self, name: &str) {
        debug!("No environment references to clean up for {}", name);
    }
}
