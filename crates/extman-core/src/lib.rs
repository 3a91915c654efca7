//! # extman-core
//!
//! Core library for the extman CLI providing:
//! - Configuration loading (defaults, config file, environment overrides)
//! - The error taxonomy shared by all extman crates
//! - Extension registry record types

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::ConfigLoader;
pub use error::{Error, Result};
pub use types::{ExtensionRecord, ExtmanConfig};
pub use utils::{get_home_dir, is_valid_extension_name, to_extension_name};
