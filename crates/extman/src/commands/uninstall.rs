//! `extman uninstall <name>`

use anyhow::Result;
use extman_core::ExtmanConfig;
use extman_extensions::UninstallOutcome;

use crate::output;

/// Roll back and remove a previously installed extension
pub async fn run(name: &str, config: &ExtmanConfig) -> Result<()> {
    let manager = super::manager(config)?;

    let spinner = output::spinner(&format!("Uninstalling {}...", name));
    let outcome = manager.uninstall(name).await;
    spinner.finish_and_clear();

    match outcome? {
        UninstallOutcome::Uninstalled(report) => {
            output::success(&format!("Uninstalled {}", report.name));
            output::kv("Removed", &report.removed_dir.display().to_string());
        }
        UninstallOutcome::NotInstalled { name } => {
            output::info(&format!("{} is not installed.", name));
        }
    }
    Ok(())
}
