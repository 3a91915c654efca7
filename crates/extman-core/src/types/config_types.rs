//! Runtime configuration types
//!
//! These types define where extensions are installed, how the registry is
//! reached, how lifecycle tasks are invoked, and the timeouts applied to every
//! network and subprocess call.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default public registry endpoint
pub const DEFAULT_REGISTRY_URL: &str = "http://ext.radiantcms.org/";

/// Relative location of installed extensions under an application root
pub const EXTENSIONS_SUBDIR: [&str; 2] = ["vendor", "extensions"];

/// Complete extman configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtmanConfig {
    /// Base URL of the remote extension catalog
    #[serde(default = "default_registry_url")]
    pub registry_url: String,

    /// Deployment/runtime environment passed to the task runner
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Variable name the environment is assigned to on the task runner command line
    #[serde(default = "default_environment_key")]
    pub environment_key: String,

    /// Program used to run lifecycle tasks
    #[serde(default = "default_task_runner")]
    pub task_runner: String,

    /// Prefix of lifecycle task names (`<prefix>:<name>:migrate`)
    #[serde(default = "default_task_prefix")]
    pub task_prefix: String,

    /// Application root; installs go to `<app-root>/vendor/extensions/<name>`
    #[serde(default = "default_app_root")]
    pub app_root: PathBuf,

    /// Additional application roots scanned read-only for installed extensions
    #[serde(default)]
    pub extra_roots: Vec<PathBuf>,

    /// Scratch directory for checkouts and downloads
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Directory holding the cached registry listing
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Registry cache lifetime in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Network and subprocess timeouts
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

/// Timeouts applied to external calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TimeoutConfig {
    /// Registry HTTP requests
    #[serde(default = "default_http_timeout")]
    pub http_secs: u64,

    /// Archive downloads
    #[serde(default = "default_download_timeout")]
    pub download_secs: u64,

    /// VCS checkouts and archive tools
    #[serde(default = "default_command_timeout")]
    pub command_secs: u64,

    /// Migration and update tasks
    #[serde(default = "default_task_timeout")]
    pub task_secs: u64,
}

impl ExtmanConfig {
    /// Directory installs are written to
    pub fn install_root(&self) -> PathBuf {
        extensions_dir(&self.app_root)
    }

    /// All extension directories scanned for the installed check, deduplicated
    pub fn scan_roots(&self) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = Vec::with_capacity(self.extra_roots.len() + 1);
        for root in std::iter::once(&self.app_root).chain(self.extra_roots.iter()) {
            let dir = extensions_dir(root);
            if !roots.contains(&dir) {
                roots.push(dir);
            }
        }
        roots
    }
}

/// `<root>/vendor/extensions`
pub fn extensions_dir(root: &std::path::Path) -> PathBuf {
    EXTENSIONS_SUBDIR
        .iter()
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

impl Default for ExtmanConfig {
    fn default() -> Self {
        Self {
            registry_url: default_registry_url(),
            environment: default_environment(),
            environment_key: default_environment_key(),
            task_runner: default_task_runner(),
            task_prefix: default_task_prefix(),
            app_root: default_app_root(),
            extra_roots: Vec::new(),
            work_dir: default_work_dir(),
            cache_dir: default_cache_dir(),
            cache_ttl_secs: default_cache_ttl(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            http_secs: default_http_timeout(),
            download_secs: default_download_timeout(),
            command_secs: default_command_timeout(),
            task_secs: default_task_timeout(),
        }
    }
}

fn default_registry_url() -> String {
    DEFAULT_REGISTRY_URL.to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_environment_key() -> String {
    "RAILS_ENV".to_string()
}

fn default_task_runner() -> String {
    "rake".to_string()
}

fn default_task_prefix() -> String {
    "radiant:extensions".to_string()
}

fn default_app_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn default_work_dir() -> PathBuf {
    std::env::temp_dir()
}

fn default_cache_dir() -> PathBuf {
    crate::utils::get_home_dir()
        .map(|home| home.join(".extman").join("cache"))
        .unwrap_or_else(|_| std::env::temp_dir().join("extman-cache"))
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_http_timeout() -> u64 {
    30
}

fn default_download_timeout() -> u64 {
    300
}

fn default_command_timeout() -> u64 {
    600
}

fn default_task_timeout() -> u64 {
    900
}
