//! Command implementations

pub mod help;
pub mod install;
pub mod uninstall;

use anyhow::Result;
use extman_core::ExtmanConfig;
use extman_extensions::{ExtensionManager, RegistryClient, SystemCommandRunner};
use std::sync::Arc;

/// Manager wired to the remote registry and real child processes
pub(crate) fn manager(config: &ExtmanConfig) -> Result<ExtensionManager> {
    let catalog = Arc::new(RegistryClient::new(config)?);
    let runner = Arc::new(SystemCommandRunner);
    Ok(ExtensionManager::new(config, catalog, runner)?)
}
