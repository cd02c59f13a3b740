//! Integration tests for Settings config loading.
//!
//! These tests only use explicit config files in temp directories.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use twentyq::application::ApplicationError;
use twentyq::config::Settings;

#[test]
fn given_explicit_config_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("twentyq.toml");
    fs::write(
        &path,
        r#"
initial_guess = "banana"
tree_file = "/var/games/tree.txt"
auto_save = true
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.initial_guess, "banana");
    assert_eq!(settings.tree_file, Some(PathBuf::from("/var/games/tree.txt")));
    assert!(settings.auto_save);
}

#[test]
fn given_partial_config_when_load_then_keeps_default_guess() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.toml");
    fs::write(&path, "auto_save = true\n").unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.initial_guess, "computer");
    assert!(settings.auto_save);
}

#[test]
fn given_env_var_in_tree_file_when_load_then_expanded() {
    let dir = TempDir::new().unwrap();
    std::env::set_var("TQ_CONFIG_TEST_DIR", dir.path());
    let path = dir.path().join("expand.toml");
    fs::write(&path, "tree_file = \"$TQ_CONFIG_TEST_DIR/tree.txt\"\n").unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.tree_file, Some(dir.path().join("tree.txt")));
}

#[test]
fn given_missing_config_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();

    let result = Settings::load(Some(&dir.path().join("absent.toml")));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_toml_when_load_then_config_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "auto_save = maybe\n").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("broken.toml"));
}
