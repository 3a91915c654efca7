//! `extman install <name>`

use anyhow::Result;
use extman_core::ExtmanConfig;
use extman_extensions::InstallOutcome;

use crate::output;

/// Install an extension from the information in the registry
pub async fn run(name: &str, config: &ExtmanConfig) -> Result<()> {
    let manager = super::manager(config)?;

    let spinner = output::spinner(&format!("Installing {}...", name));
    let outcome = manager.install(name).await;
    spinner.finish_and_clear();

    match outcome? {
        InstallOutcome::Installed(report) => {
            output::success(&format!("Installed {}", report.name));
            output::kv("Install type", report.install_type);
            output::kv("Location", &report.install_dir.display().to_string());
        }
        InstallOutcome::AlreadyInstalled { name, .. } => {
            output::info(&format!("{} is already installed.", name));
        }
    }
    Ok(())
}
