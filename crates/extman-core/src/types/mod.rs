//! Type definitions for extman

mod config_types;
mod extension_types;

pub use config_types::*;
pub use extension_types::*;
