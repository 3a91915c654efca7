//! Uninstall pipeline tests

mod common;

use common::{Fixture, Rule, ScriptedRunner};
use extman_core::{Error, ExtensionRecord, ExtmanConfig};
use extman_extensions::{ActionRunner, ExtensionPaths, UninstallOutcome, Uninstaller};
use std::fs;

fn record(name: &str) -> ExtensionRecord {
    ExtensionRecord::new(name)
        .with_install_type("Git")
        .with_repository_url(format!("https://host/{}.git", name))
}

#[tokio::test]
async fn test_migrates_down_then_removes_directory() {
    let fixture = Fixture::new();
    let dir = fixture.preinstall("my_ext");
    let runner = ScriptedRunner::new();
    let manager = fixture.manager(vec![record("my_ext")], runner.clone());

    let outcome = manager.uninstall("my_ext").await.unwrap();

    assert_eq!(
        runner.command_lines(),
        vec!["rake ext:my_ext:migrate VERSION=0 RAILS_ENV=test".to_string()]
    );
    assert!(!dir.exists());
    match outcome {
        UninstallOutcome::Uninstalled(report) => assert_eq!(report.removed_dir, dir),
        other => panic!("expected uninstall, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_rollback_leaves_directory_intact() {
    let fixture = Fixture::new();
    let dir = fixture.preinstall("my_ext");
    let runner = ScriptedRunner::new();
    runner.on(Rule::failure(
        "rake ext:my_ext:migrate VERSION=0",
        1,
        "PG::UndefinedTable",
    ));
    let manager = fixture.manager(vec![record("my_ext")], runner.clone());

    let err = manager.uninstall("my_ext").await.unwrap_err();

    assert!(matches!(err, Error::TaskFailure { .. }));
    assert!(dir.join("README").is_file());
    assert!(manager.is_installed("my_ext"));
}

#[tokio::test]
async fn test_not_installed_is_a_no_op_without_mutation() {
    let fixture = Fixture::new();
    let runner = ScriptedRunner::new();
    let manager = fixture.manager(vec![record("my_ext")], runner.clone());

    let outcome = manager.uninstall("my_ext").await.unwrap();

    assert_eq!(
        outcome,
        UninstallOutcome::NotInstalled {
            name: "my_ext".to_string()
        }
    );
    assert_eq!(runner.call_count(), 0);
    assert!(!fixture.app_root().exists());
}

#[tokio::test]
async fn test_missing_registry_record_does_not_block_uninstall() {
    let fixture = Fixture::new();
    let dir = fixture.preinstall("local_only");
    let runner = ScriptedRunner::new();
    let manager = fixture.manager(vec![], runner.clone());

    manager.uninstall("local_only").await.unwrap();

    assert!(!dir.exists());
    assert_eq!(runner.call_count(), 1);
}

#[tokio::test]
async fn test_extension_under_read_only_root_is_refused() {
    let mut fixture = Fixture::new();
    let shared = fixture.temp.path().join("shared");
    let shared_dir = shared.join("vendor/extensions/markdown_filter");
    fs::create_dir_all(&shared_dir).unwrap();
    fixture.config.extra_roots = vec![shared];

    let runner = ScriptedRunner::new();
    let manager = fixture.manager(vec![record("markdown_filter")], runner.clone());
    assert!(manager.is_installed("markdown_filter"));

    let err = manager.uninstall("markdown_filter").await.unwrap_err();

    assert!(matches!(err, Error::RemoveFailure { .. }));
    assert_eq!(runner.call_count(), 0);
    assert!(shared_dir.is_dir());
}

#[tokio::test]
async fn test_uninstaller_rejects_directory_it_cannot_find() {
    let fixture = Fixture::new();
    let runner = ScriptedRunner::new();
    let config: &ExtmanConfig = &fixture.config;
    let uninstaller = Uninstaller::new(
        ActionRunner::new(config, runner.clone()),
        ExtensionPaths::from_config(config),
    );

    let err = uninstaller.uninstall("ghost").await.unwrap_err();

    assert!(matches!(err, Error::RemoveFailure { ref message, .. } if message == "not installed"));
    assert_eq!(runner.call_count(), 0);
}
