// tests/config_test.rs
use commit_bump::config::{load_config, Config, CONFIG_FILE_NAME};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Fixture paths are absolute so they survive tests that change directory.
fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.manifest.path, PathBuf::from("pubspec.yaml"));
    assert_eq!(config.manifest.key, "version");
    assert_eq!(
        config.commit.message,
        "chore: bump version to {version} [skip ci]"
    );
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[manifest]
path = "mobile/pubspec.yaml"
key = "version"

[commit]
enabled = false

[behavior]
skip_markers = ["[skip ci]", "[bot]"]
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path())).unwrap();
    assert_eq!(config.manifest.path, PathBuf::from("mobile/pubspec.yaml"));
    assert!(!config.commit.enabled);
    assert!(config.behavior.skip_markers.contains(&"[bot]".to_string()));
    assert_eq!(config.push.remote, "origin");
}

#[test]
fn test_load_fixture_with_push() {
    let config = load_config(Some(&fixture("config_with_push.toml")))
        .expect("Failed to load test config");
    assert!(config.push.enabled);
    assert_eq!(config.push.remote, "upstream");
    assert_eq!(config.push.branch.as_deref(), Some("main"));
    assert_eq!(config.commit.author_name, "release-bot");
    assert_eq!(
        config.commit.render_message("1.0.0+1", "1.1.0+2"),
        "build: release 1.1.0+2 (was 1.0.0+1) [ci skip]"
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_explicit_file_is_error() {
    let result = load_config(Some(&fixture("does_not_exist.toml")));
    assert!(result.is_err());
}

#[test]
fn test_malformed_file_names_path() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[push]\nenabled = \"yes\"\n").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path())).unwrap_err().to_string();
    assert!(err.starts_with("Configuration error"));
    assert!(err.contains(&temp_file.path().display().to_string()));
}

#[test]
#[serial]
fn test_discovers_file_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[manifest]\npath = \"from_cwd.yaml\"\n",
    )
    .unwrap();

    let original = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let result = load_config(None);
    env::set_current_dir(original).unwrap();

    assert_eq!(
        result.unwrap().manifest.path,
        PathBuf::from("from_cwd.yaml")
    );
}
