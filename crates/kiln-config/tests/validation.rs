//! Tests for filesystem validation.

use kiln_config::{BuildConfig, BuildSettings, ConfigError, ConfigValidator, FsValidator, validate_fs};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn scaffold(root: &Path) {
    fs::create_dir_all(root.join("templates/js")).expect("create templates/js");
    fs::create_dir_all(root.join("templates/html")).expect("create templates/html");
    fs::create_dir_all(root.join("app")).expect("create app");
    fs::write(root.join("templates/js/script.dev.js"), "").expect("write dev script");
    fs::write(root.join("templates/html/index.dev.html"), "<html></html>").expect("write template");
    fs::write(root.join("app/script.js"), "").expect("write app script");
}

#[test]
fn validate_succeeds_for_complete_project() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());

    FsValidator::new(dir.path())
        .validate(&BuildSettings::development())
        .expect("project is complete");
}

#[test]
fn validate_catches_missing_entry() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());
    fs::remove_file(dir.path().join("app/script.js")).expect("remove entry");

    match validate_fs(&BuildSettings::development(), dir.path()).unwrap_err() {
        ConfigError::EntryNotFound { path } => assert!(path.ends_with("app/script.js")),
        other => panic!("expected EntryNotFound, got {other:?}"),
    }
}

#[test]
fn validate_catches_missing_template() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());
    fs::remove_file(dir.path().join("templates/html/index.dev.html")).expect("remove template");

    match validate_fs(&BuildSettings::development(), dir.path()).unwrap_err() {
        ConfigError::TemplateNotFound { path } => {
            assert!(path.ends_with("templates/html/index.dev.html"))
        }
        other => panic!("expected TemplateNotFound, got {other:?}"),
    }
}

#[test]
fn construction_does_not_touch_the_filesystem() {
    let dir = TempDir::new().expect("tempdir");
    // nothing scaffolded: building the descriptor still succeeds
    let config = BuildConfig::development(dir.path()).expect("descriptor");
    assert!(FsValidator::check(&config).is_err());
}

#[test]
fn directory_is_not_an_entry() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());
    fs::remove_file(dir.path().join("app/script.js")).expect("remove entry");
    fs::create_dir(dir.path().join("app/script.js")).expect("create dir in its place");

    assert!(matches!(
        validate_fs(&BuildSettings::development(), dir.path()),
        Err(ConfigError::EntryNotFound { .. })
    ));
}
