//! Shared test utilities for extman-extensions integration tests
//!
//! - [`ScriptedRunner`]: records every command and answers from a script,
//!   optionally creating files the real tool would have produced
//! - [`MemoryCatalog`]: fixed in-memory registry
//! - [`Fixture`]: temporary app root, work dir and cache dir

#![allow(dead_code)]

use async_trait::async_trait;
use extman_core::{ExtensionRecord, ExtmanConfig, Result};
use extman_extensions::{CommandOutput, CommandRunner, CommandSpec, ExtensionManager};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Scripted answer for commands whose command line starts with `prefix`
#[derive(Clone, Debug)]
pub struct Rule {
    prefix: String,
    output: CommandOutput,
    creates: Vec<String>,
}

impl Rule {
    pub fn success(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            output: CommandOutput::default(),
            creates: Vec::new(),
        }
    }

    pub fn failure(prefix: &str, code: i32, stderr: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            output: CommandOutput {
                code,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
            creates: Vec::new(),
        }
    }

    pub fn stdout(mut self, stdout: &str) -> Self {
        self.output.stdout = stdout.to_string();
        self
    }

    /// File (relative to the command's working directory) the command creates
    pub fn creates(mut self, relative: &str) -> Self {
        self.creates.push(relative.to_string());
        self
    }
}

/// Recording command runner; unscripted commands succeed silently
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, rule: Rule) {
        self.rules.lock().unwrap().push(rule);
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Command lines of every recorded call, in order
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(CommandSpec::command_line).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(spec.clone());

        let line = spec.command_line();
        let rule = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|r| line.starts_with(&r.prefix))
            .cloned();

        let Some(rule) = rule else {
            return Ok(CommandOutput::default());
        };

        if rule.output.success() {
            let cwd = spec.cwd.clone().unwrap_or_default();
            for relative in &rule.creates {
                let path = cwd.join(relative);
                fs::create_dir_all(path.parent().unwrap())?;
                fs::write(&path, relative)?;
            }
        }
        Ok(rule.output)
    }
}

/// Registry served from memory
pub struct MemoryCatalog {
    records: Vec<ExtensionRecord>,
}

impl MemoryCatalog {
    pub fn new(records: Vec<ExtensionRecord>) -> Arc<Self> {
        Arc::new(Self { records })
    }
}

#[async_trait]
impl extman_extensions::ExtensionCatalog for MemoryCatalog {
    async fn list_all(&self) -> Result<Vec<ExtensionRecord>> {
        Ok(self.records.clone())
    }
}

/// Temporary application layout
pub struct Fixture {
    pub temp: TempDir,
    pub config: ExtmanConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config = ExtmanConfig {
            environment: "test".to_string(),
            task_prefix: "ext".to_string(),
            app_root: temp.path().join("app"),
            work_dir: temp.path().join("work"),
            cache_dir: temp.path().join("cache"),
            ..Default::default()
        };
        Self { temp, config }
    }

    pub fn app_root(&self) -> &Path {
        &self.config.app_root
    }

    pub fn work_dir(&self) -> &Path {
        &self.config.work_dir
    }

    /// `<app>/vendor/extensions`
    pub fn extensions_dir(&self) -> PathBuf {
        self.config.install_root()
    }

    pub fn install_dir(&self, name: &str) -> PathBuf {
        self.extensions_dir().join(name)
    }

    /// Pretend `name` is already installed under the app root
    pub fn preinstall(&self, name: &str) -> PathBuf {
        let dir = self.install_dir(name);
        fs::create_dir_all(dir.join("lib")).unwrap();
        fs::write(dir.join("README"), name).unwrap();
        dir
    }

    pub fn manager(
        &self,
        records: Vec<ExtensionRecord>,
        runner: Arc<ScriptedRunner>,
    ) -> ExtensionManager {
        ExtensionManager::new(&self.config, MemoryCatalog::new(records), runner).unwrap()
    }
}

/// `rake <prefix>:<name>:<action> RAILS_ENV=test` as issued for a fixture
pub fn task_line(name: &str, action: &str) -> String {
    format!("rake ext:{}:{} RAILS_ENV=test", name, action)
}
