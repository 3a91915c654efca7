//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Built-in defaults
//! 2. Config file (explicit path, else ~/.extman/config.yaml when present)
//! 3. Environment variables (EXTMAN_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::ExtmanConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Registry base URL override
pub const ENV_REGISTRY_URL: &str = "EXTMAN_REGISTRY_URL";
/// Deployment/runtime environment name
pub const ENV_ENVIRONMENT: &str = "EXTMAN_ENV";
/// Application root override
pub const ENV_APP_ROOT: &str = "EXTMAN_APP_ROOT";
/// Extra read-only roots, `:`-separated
pub const ENV_EXTRA_ROOTS: &str = "EXTMAN_EXTRA_ROOTS";
/// Scratch directory override
pub const ENV_WORK_DIR: &str = "EXTMAN_WORK_DIR";

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Configuration hierarchy loader
pub struct ConfigLoader {
    /// Directory searched for the default config file
    config_dir: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader rooted at ~/.extman
    pub fn new() -> Self {
        let config_dir = crate::utils::get_home_dir()
            .ok()
            .map(|home| home.join(".extman"));
        Self { config_dir }
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: Some(config_dir.into()),
        }
    }

    /// Load configuration, reading `explicit` instead of the default file when given
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load(&self, explicit: Option<&Path>) -> Result<ExtmanConfig> {
        let config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::invalid_config(format!(
                        "Configuration file not found: {}",
                        path.display()
                    )));
                }
                self.load_yaml_file(path)?
            }
            None => match self.default_config_path() {
                Some(path) if path.exists() => self.load_yaml_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    ExtmanConfig::default()
                }
            },
        };

        apply_env_overrides(config)
    }

    /// Path of the default config file, if a config directory is known
    pub fn default_config_path(&self) -> Option<PathBuf> {
        self.config_dir
            .as_ref()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    fn load_yaml_file(&self, path: &Path) -> Result<ExtmanConfig> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content).map_err(|e| {
            Error::invalid_config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply EXTMAN_* environment variable overrides
pub fn apply_env_overrides(mut config: ExtmanConfig) -> Result<ExtmanConfig> {
    if let Some(val) = non_empty_var(ENV_REGISTRY_URL) {
        config.registry_url = val;
    }

    if let Some(val) = non_empty_var(ENV_ENVIRONMENT) {
        config.environment = val;
    }

    if let Some(val) = non_empty_var(ENV_APP_ROOT) {
        config.app_root = PathBuf::from(val);
    }

    if let Some(val) = non_empty_var(ENV_EXTRA_ROOTS) {
        config.extra_roots = env::split_paths(&val)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
    }

    if let Some(val) = non_empty_var(ENV_WORK_DIR) {
        config.work_dir = PathBuf::from(val);
    }

    validate(&config)?;
    Ok(config)
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn validate(config: &ExtmanConfig) -> Result<()> {
    if config.registry_url.trim().is_empty() {
        return Err(Error::invalid_config("registry-url must not be empty"));
    }
    if config.task_runner.trim().is_empty() {
        return Err(Error::invalid_config("task-runner must not be empty"));
    }
    if config.environment_key.contains('=') || config.environment_key.trim().is_empty() {
        return Err(Error::invalid_config(
            "environment-key must be a non-empty variable name",
        ));
    }
    Ok(())
}
