//! Error types for extman-core

use thiserror::Error;

/// Result type alias using extman-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by every extman crate
#[derive(Error, Debug)]
pub enum Error {
    /// A required command-line argument was not given
    #[error("{message}")]
    MissingArgument { message: String },

    /// Extension name is not a single lower-case path component
    #[error("Invalid extension name: '{name}'. Names may only contain a-z, 0-9 and '_'")]
    InvalidName { name: String },

    /// Subcommand not present in the dispatcher table
    #[error("Unknown command: {command}. Available commands: {available}")]
    CommandNotFound { command: String, available: String },

    /// Registry record names an install type with no registered strategy
    #[error("Unknown install type: {install_type}. Known install types: {available}")]
    UnknownInstallType {
        install_type: String,
        available: String,
    },

    /// Extension is not listed in the registry
    #[error("Extension not found in registry: {name}")]
    ExtensionNotFound { name: String },

    /// Registry record is missing a field the selected strategy needs
    #[error("Extension '{name}' has no {field}")]
    MissingField { name: String, field: String },

    /// Network or process failure while acquiring extension source
    #[error("Failed to fetch extension: {message}")]
    FetchFailure { message: String },

    /// Acquisition succeeded but its output did not have the expected shape
    #[error("Could not determine unpacked source location: {message}")]
    FetchParseError { message: String },

    /// Copying the source tree into the extensions directory failed
    #[error("Failed to copy extension into place: {message}")]
    CopyFailure { message: String },

    /// Removing the installed extension directory failed
    #[error("Failed to remove {path}: {message}")]
    RemoveFailure { path: String, message: String },

    /// A migration or update task exited non-zero
    #[error("Task '{task}' failed (exit code {code}): {output}")]
    TaskFailure {
        task: String,
        code: i32,
        output: String,
    },

    /// Registry unreachable or returned an unusable response
    #[error("Registry error: {message}")]
    Registry { message: String },

    /// Invalid configuration value or file
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a missing argument error
    pub fn missing_argument(message: impl Into<String>) -> Self {
        Self::MissingArgument {
            message: message.into(),
        }
    }

    /// Create a command not found error
    pub fn command_not_found(command: impl Into<String>, available: &[&str]) -> Self {
        Self::CommandNotFound {
            command: command.into(),
            available: available.join(", "),
        }
    }

    /// Create an unknown install type error
    pub fn unknown_install_type(install_type: impl Into<String>, available: &[&str]) -> Self {
        Self::UnknownInstallType {
            install_type: install_type.into(),
            available: available.join(", "),
        }
    }

    /// Create an extension not found error
    pub fn extension_not_found(name: impl Into<String>) -> Self {
        Self::ExtensionNotFound { name: name.into() }
    }

    /// Create a missing field error
    pub fn missing_field(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            name: name.into(),
            field: field.into(),
        }
    }

    /// Create a fetch failure error
    pub fn fetch_failure(message: impl Into<String>) -> Self {
        Self::FetchFailure {
            message: message.into(),
        }
    }

    /// Create a fetch parse error
    pub fn fetch_parse(message: impl Into<String>) -> Self {
        Self::FetchParseError {
            message: message.into(),
        }
    }

    /// Create a copy failure error
    pub fn copy_failure(message: impl Into<String>) -> Self {
        Self::CopyFailure {
            message: message.into(),
        }
    }

    /// Create a remove failure error
    pub fn remove_failure(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoveFailure {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a task failure error
    pub fn task_failure(task: impl Into<String>, code: i32, output: impl Into<String>) -> Self {
        Self::TaskFailure {
            task: task.into(),
            code,
            output: output.into(),
        }
    }

    /// Create an invalid name error
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    /// Create a registry error
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Process exit code for this error kind
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MissingArgument { .. } => 2,
            Self::CommandNotFound { .. } => 3,
            Self::UnknownInstallType { .. } => 4,
            Self::ExtensionNotFound { .. } => 5,
            Self::MissingField { .. } => 6,
            Self::InvalidName { .. } => 7,
            Self::FetchFailure { .. } => 10,
            Self::FetchParseError { .. } => 11,
            Self::CopyFailure { .. } => 12,
            Self::RemoveFailure { .. } => 13,
            Self::TaskFailure { .. } => 14,
            Self::Registry { .. } => 20,
            Self::InvalidConfig { .. } | Self::YamlParse(_) | Self::JsonParse(_) => 30,
            Self::Io(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_exit_codes_are_distinct_per_kind() {
        let errors = [
            Error::missing_argument("x"),
            Error::command_not_found("x", &[]),
            Error::unknown_install_type("x", &[]),
            Error::extension_not_found("x"),
            Error::missing_field("x", "y"),
            Error::invalid_name("x"),
            Error::fetch_failure("x"),
            Error::fetch_parse("x"),
            Error::copy_failure("x"),
            Error::remove_failure("x", "y"),
            Error::task_failure("x", 1, "y"),
            Error::registry("x"),
            Error::invalid_config("x"),
        ];

        let codes: HashSet<u8> = errors.iter().map(Error::exit_code).collect();
        assert_eq!(codes.len(), errors.len());
        assert!(!codes.contains(&0));
    }

    #[test]
    fn test_unknown_install_type_lists_available() {
        let err = Error::unknown_install_type("Mercurial", &["Git", "Zip"]);
        assert_eq!(
            err.to_string(),
            "Unknown install type: Mercurial. Known install types: Git, Zip"
        );
    }

    #[test]
    fn test_missing_argument_is_literal() {
        let err = Error::missing_argument("You must specify an extension to install.");
        assert_eq!(err.to_string(), "You must specify an extension to install.");
    }
}
