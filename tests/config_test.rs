// tests/config_test.rs
use maven_release_action::config::{load_settings, CredentialMode, ReleaseSettings, SETTINGS_FILE};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_load_from_fixture() {
    let settings = load_settings(
        Some(Path::new("tests/fixtures/release_settings.toml")),
        Path::new("."),
    )
    .expect("Failed to load test settings");

    assert_eq!(settings.release_branch, "main");
    assert_eq!(settings.build.command.as_deref(), Some("./mvnw"));
    assert_eq!(settings.build.extra_args, vec!["--no-transfer-progress", "-B"]);
    assert_eq!(settings.build.descriptor, "pom.xml");
    assert_eq!(settings.commit.release_message, "ci: release version");
    assert_eq!(
        settings.commit.snapshot_message,
        "GitHub Action: SNAPSHOT version"
    );
    assert_eq!(settings.credentials.mode, CredentialMode::Environment);
    assert_eq!(settings.credentials.host, "git.example.com");
    assert_eq!(settings.process.timeout(), Some(Duration::from_secs(900)));
}

#[test]
fn test_working_copy_settings_file_is_picked_up() {
    let workdir = tempfile::tempdir().unwrap();
    std::fs::write(
        workdir.path().join(SETTINGS_FILE),
        "[build]\ndescriptor = \"app/pom.xml\"\n",
    )
    .unwrap();

    let settings = load_settings(None, workdir.path()).unwrap();
    assert_eq!(settings.build.descriptor, "app/pom.xml");
    assert_eq!(settings.release_branch, "master");
}

#[test]
fn test_invalid_toml_is_an_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"release_branch = [not toml").unwrap();
    temp_file.flush().unwrap();

    let err = load_settings(Some(temp_file.path()), Path::new(".")).unwrap_err();
    assert!(err.to_string().contains("Settings file error"));
}

#[test]
fn test_empty_release_branch_is_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"release_branch = \"\"\n").unwrap();
    temp_file.flush().unwrap();

    let err = load_settings(Some(temp_file.path()), Path::new(".")).unwrap_err();
    assert!(err.to_string().contains("release_branch"));
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    assert!(load_settings(Some(Path::new("tests/fixtures/nope.toml")), Path::new(".")).is_err());
}

#[test]
fn test_default_settings_round_trip_through_toml() {
    let defaults = ReleaseSettings::default();
    let rendered = toml::to_string(&defaults).unwrap();
    let parsed: ReleaseSettings = toml::from_str(&rendered).unwrap();
    assert_eq!(parsed, defaults);
}
