//! CLI argument parsing with clap
//!
//! Only the global flags are declared here. The command word and its
//! arguments are passed through untouched to [`crate::dispatcher`].

use anyhow::Result;
use clap::Parser;
use extman_core::{ConfigLoader, ExtmanConfig};
use std::path::PathBuf;

/// extman - install and uninstall application extensions from a registry
#[derive(Parser, Debug)]
#[command(name = "extman")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Type 'extman help [command]' for information about a command.")]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to a config file (default: ~/.extman/config.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Registry base URL
    #[arg(long, value_name = "URL")]
    pub registry_url: Option<String>,

    /// Runtime environment passed to migration and update tasks
    #[arg(long = "env", value_name = "NAME")]
    pub environment: Option<String>,

    /// Application root holding vendor/extensions
    #[arg(long, value_name = "DIR")]
    pub app_root: Option<PathBuf>,

    /// Command (install, uninstall, help) followed by its arguments
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// Defaults, then config file, then EXTMAN_* variables, then these flags
    pub fn load_config(&self) -> Result<ExtmanConfig> {
        let mut config = ConfigLoader::new().load(self.config.as_deref())?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut ExtmanConfig) {
        if let Some(url) = &self.registry_url {
            config.registry_url = url.clone();
        }
        if let Some(env) = &self.environment {
            config.environment = env.clone();
        }
        if let Some(root) = &self.app_root {
            config.app_root = root.clone();
        }
    }
}
