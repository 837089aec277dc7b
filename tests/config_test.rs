// tests/config_test.rs
use semrel::config::{load_config, parse_config, Config, MissingMarker};
use semrel::domain::{CommitType, SemanticVersion};
use semrel::SemrelError;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.release.tag_format, "v{version}");
    assert_eq!(config.release.branch, "main");
    assert_eq!(config.release.remote, "origin");
    assert_eq!(config.changelog.path, PathBuf::from("CHANGELOG.md"));
    assert_eq!(config.changelog.placeholder, "<!--next-version-placeholder-->");
    assert_eq!(config.changelog.missing_marker, MissingMarker::Insert);
    assert_eq!(config.hvcs.domain, "github.com");
    assert!(!config.hvcs.ignore_token_for_push);
    assert!(config
        .conventional_commits
        .breaking_change_indicators
        .contains(&"BREAKING CHANGE:".to_string()));
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[release]
tag_format = "ver{version}"

[conventional_commits]
types = ["feat", "fix", "chore"]
feature_types = ["feat"]
fix_types = ["fix"]
performance_types = []
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path())).unwrap();
    assert_eq!(config.release.tag_format, "ver{version}");
    assert_eq!(config.conventional_commits.types, vec!["feat", "fix", "chore"]);

    let pattern = config.release.tag_pattern().unwrap();
    assert_eq!(pattern.format(&SemanticVersion::new(1, 0, 0)), "ver1.0.0");
}

#[test]
fn test_load_fixture() {
    let config = load_config(Some(Path::new("tests/fixtures/semrel.toml")))
        .expect("Failed to load test config");

    assert_eq!(config.release.tag_format, "release-{version}");
    assert_eq!(config.release.skip_tags, vec!["release-0.0.1"]);
    assert_eq!(config.release.branch, "master");
    assert_eq!(config.release.version_variables, vec!["setup.py:__version__"]);
    assert_eq!(config.changelog.path, PathBuf::from("docs/CHANGELOG.md"));
    assert_eq!(config.changelog.missing_marker, MissingMarker::Refuse);
    assert_eq!(
        config.changelog.sections,
        vec![CommitType::Breaking, CommitType::Feature, CommitType::Fix]
    );
    assert_eq!(config.hvcs.domain, "gitlab.example.com");
    assert!(config.hvcs.ignore_token_for_push);
    // Untouched sections keep their defaults
    assert_eq!(config.release.remote, "origin");
    assert_eq!(config.changelog.header, "# Changelog");
}

#[test]
fn test_missing_file_is_an_error() {
    let result = load_config(Some(Path::new("tests/fixtures/does-not-exist.toml")));
    assert!(matches!(result, Err(SemrelError::Io(_))));
}

#[test]
fn test_invalid_toml() {
    let result = parse_config("[release\ntag_format = ");
    assert!(matches!(result, Err(SemrelError::Toml(_))));
}

#[test]
fn test_tag_format_without_placeholder_fails_fast() {
    let result = parse_config("[release]\ntag_format = \"v1\"\n");
    assert!(result.is_err());
}

#[test]
fn test_version_pattern_needs_one_group() {
    let err = parse_config("[release]\nversion_pattern = \"^v(\\\\d+)\\\\.(\\\\d+)$\"\n").unwrap_err();
    assert!(matches!(err, SemrelError::Pattern { .. }));
}

#[test]
#[serial]
fn test_discovers_config_in_current_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("semrel.toml"),
        "[release]\nbranch = \"trunk\"\n",
    )
    .unwrap();

    let original = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let result = load_config(None);
    env::set_current_dir(original).unwrap();

    assert_eq!(result.unwrap().release.branch, "trunk");
}
