//! Command dispatch
//!
//! The first word selects the command (default `help`). It is camelized and
//! looked up case-sensitively in a fixed name -> constructor table, so
//! `install` and `Install` resolve while `INSTALL` does not.

use extman_core::{Error, Result};

/// A parsed command ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Install { name: String },
    Uninstall { name: String },
    Help { topic: Option<String> },
}

type Constructor = fn(&[String]) -> Result<Command>;

const COMMANDS: &[(&str, Constructor)] = &[
    ("Install", install),
    ("Uninstall", uninstall),
    ("Help", help),
];

/// Resolve `args` (command word first) to a [`Command`]
pub fn parse(args: &[String]) -> Result<Command> {
    let (word, rest) = match args.split_first() {
        Some((word, rest)) => (word.as_str(), rest),
        None => ("help", args),
    };

    let key = camelize(word);
    let constructor = COMMANDS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, constructor)| *constructor)
        .ok_or_else(|| Error::command_not_found(word, &command_names()))?;

    constructor(rest)
}

/// Lower-case names of the available commands
pub fn command_names() -> Vec<&'static str> {
    vec!["install", "uninstall", "help"]
}

/// `install` -> `Install`, `un_install` -> `UnInstall`
pub fn camelize(word: &str) -> String {
    word.split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

fn install(args: &[String]) -> Result<Command> {
    Ok(Command::Install {
        name: required_name(args, "install")?,
    })
}

fn uninstall(args: &[String]) -> Result<Command> {
    Ok(Command::Uninstall {
        name: required_name(args, "uninstall")?,
    })
}

fn help(args: &[String]) -> Result<Command> {
    Ok(Command::Help {
        topic: args.first().cloned(),
    })
}

fn required_name(args: &[String], command: &str) -> Result<String> {
    args.first()
        .filter(|name| !name.trim().is_empty())
        .cloned()
        .ok_or_else(|| {
            Error::missing_argument(format!("You must specify an extension to {}.", command))
        })
}
