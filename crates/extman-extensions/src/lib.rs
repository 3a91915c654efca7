//! Extension acquisition and installation for extman
//!
//! This crate handles:
//! - Registry lookups (with an on-disk cache)
//! - Fetch strategies: VCS checkout and archive download/unpack
//! - The install and uninstall pipelines
//! - Lifecycle task invocation through the host's task runner
//! - Per-extension locking and the installed check

pub mod action;
pub mod fetch;
pub mod installer;
pub mod lock;
pub mod manager;
pub mod paths;
pub mod registry;
pub mod runner;
pub mod uninstaller;

pub use action::ActionRunner;
pub use fetch::{
    ArchiveFormat, Checkout, Download, FetchContext, FetchStrategy, StrategySelector, Vcs,
};
pub use installer::{InstallReport, InstallState, Installer};
pub use lock::ExtensionLock;
pub use manager::{ExtensionManager, InstallOutcome, UninstallOutcome};
pub use paths::ExtensionPaths;
pub use registry::{ExtensionCatalog, RegistryClient};
pub use runner::{CommandOutput, CommandRunner, CommandSpec, SystemCommandRunner};
pub use uninstaller::{UninstallReport, Uninstaller};
