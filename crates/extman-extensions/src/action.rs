//! Lifecycle task invocation
//!
//! The host application implements `<prefix>:<name>:migrate` and
//! `<prefix>:<name>:update` tasks; extman only invokes them through the
//! configured task runner, passing the runtime environment through.

use crate::runner::{CommandOutput, CommandRunner, CommandSpec};
use extman_core::{Error, ExtmanConfig, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Runs named host-application tasks
#[derive(Clone)]
pub struct ActionRunner {
    program: String,
    task_prefix: String,
    environment_key: String,
    environment: String,
    app_root: PathBuf,
    timeout: Duration,
    runner: Arc<dyn CommandRunner>,
}

impl ActionRunner {
    pub fn new(config: &ExtmanConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            program: config.task_runner.clone(),
            task_prefix: config.task_prefix.clone(),
            environment_key: config.environment_key.clone(),
            environment: config.environment.clone(),
            app_root: config.app_root.clone(),
            timeout: Duration::from_secs(config.timeouts.task_secs),
            runner,
        }
    }

    /// Run `task` with extra `args`; a non-zero exit is a `TaskFailure`
    pub async fn run(&self, task: &str, args: &[&str]) -> Result<CommandOutput> {
        let spec = CommandSpec::new(&self.program)
            .arg(task)
            .args(args.iter().copied())
            .arg(format!("{}={}", self.environment_key, self.environment))
            .current_dir(&self.app_root)
            .timeout(self.timeout);

        info!("Running task {}", task);
        let output = self.runner.run(&spec).await.map_err(|e| match e {
            Error::Io(io) => Error::task_failure(task, -1, io.to_string()),
            other => other,
        })?;

        if !output.success() {
            return Err(Error::task_failure(task, output.code, output.diagnostic()));
        }

        debug!("Task {} finished", task);
        Ok(output)
    }

    /// Apply the extension's migrations
    pub async fn migrate(&self, name: &str) -> Result<CommandOutput> {
        self.run(&self.task_name(name, "migrate"), &[]).await
    }

    /// Roll the extension's migrations back to version 0
    pub async fn migrate_down(&self, name: &str) -> Result<CommandOutput> {
        self.run(&self.task_name(name, "migrate"), &["VERSION=0"])
            .await
    }

    /// Run the extension's update/setup task
    pub async fn update(&self, name: &str) -> Result<CommandOutput> {
        self.run(&self.task_name(name, "update"), &[]).await
    }

    /// `<prefix>:<name>:<action>`
    pub fn task_name(&self, name: &str, action: &str) -> String {
        format!("{}:{}:{}", self.task_prefix, name, action)
    }
}
