//! extman - install and uninstall application extensions
//!
//! This is the main entry point for the extman command-line interface.

mod cli;
mod commands;
mod dispatcher;
mod output;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    // This must be done before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let command = dispatcher::parse(&cli.args)?;
    if let dispatcher::Command::Help { topic } = &command {
        commands::help::run(topic.as_deref());
        return Ok(());
    }

    let config = cli.load_config()?;
    tracing::debug!("Using app root {}", config.app_root.display());
    match command {
        dispatcher::Command::Install { name } => commands::install::run(&name, &config).await,
        dispatcher::Command::Uninstall { name } => commands::uninstall::run(&name, &config).await,
        dispatcher::Command::Help { .. } => Ok(()),
    }
}

/// Exit code of the typed error behind `e`, or 1
fn exit_code(e: &anyhow::Error) -> u8 {
    e.chain()
        .find_map(|cause| cause.downcast_ref::<extman_core::Error>())
        .map(extman_core::Error::exit_code)
        .unwrap_or(1)
}

/// Initialize tracing with appropriate verbosity
///
/// Status lines are printed by [`output`], so the default filter only lets
/// warnings through. `RUST_LOG` takes precedence over the flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("warn"),
                1 => EnvFilter::new("debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_from_typed_error() {
        let err = anyhow::Error::new(extman_core::Error::missing_argument("x"));
        assert_eq!(exit_code(&err), 2);

        let err = anyhow::Error::new(extman_core::Error::task_failure("t", 1, ""))
            .context("while installing");
        assert_eq!(exit_code(&err), 14);

        assert_eq!(exit_code(&anyhow::anyhow!("untyped")), 1);
    }
}
