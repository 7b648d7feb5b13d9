//! Integration tests for config loading across file formats and CLI layering.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use devserve::cli::Cli;
use devserve::config::model::FileConfig;
use devserve::config::sources::{load_file, parse_config_str};
use devserve::config::{resolve, validation, ServeMode};
use devserve::error::DevserveError;

fn load_demo(name: &str) -> String {
    let path = format!("demos/{name}");
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}

#[cfg(feature = "yaml")]
#[test]
fn yaml_demo_matches_defaults() {
    let content = load_demo("devserve.yaml");
    let config = parse_config_str("yaml", &content, "devserve.yaml").unwrap();
    validation::validate(&config, ServeMode::Http).unwrap();
    assert_eq!(config, FileConfig::default());
}

#[cfg(feature = "json")]
#[test]
fn json_demo_loads_and_validates() {
    let content = load_demo("devserve.json");
    let config = parse_config_str("json", &content, "devserve.json").unwrap();
    validation::validate(&config, ServeMode::Http).unwrap();
    assert_eq!(config.upstream, "http://localhost:1337");
}

#[cfg(feature = "toml")]
#[test]
fn toml_demo_loads_and_validates() {
    let content = load_demo("devserve.toml");
    let config = parse_config_str("toml", &content, "devserve.toml").unwrap();
    validation::validate(&config, ServeMode::Http).unwrap();
    assert_eq!(config.timeout, 10_000);
}

#[cfg(feature = "yaml")]
#[test]
fn explicit_config_file_is_layered_under_cli_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devserve.yaml");
    std::fs::write(
        &path,
        "port: 9000\nupstream: http://localhost:7171/\ntimeout: 1500\n",
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "devserve",
        "--config",
        path.to_str().unwrap(),
        "--port",
        "9100",
    ])
    .unwrap();
    let settings = resolve(&cli).unwrap();

    assert_eq!(settings.mode, ServeMode::Http);
    assert_eq!(settings.port, 9100);
    assert_eq!(settings.proxy.upstream, "http://localhost:7171");
    assert_eq!(settings.proxy.timeout, Duration::from_millis(1500));
    assert_eq!(settings.source.as_deref(), Some(path.as_path()));
}

#[test]
fn invalid_mode_aborts_resolution() {
    let cli = Cli::try_parse_from(["devserve", "ftp"]).unwrap();
    let err = resolve(&cli).unwrap_err();
    assert!(matches!(err, DevserveError::InvalidMode(ref m) if m == "ftp"));
}

#[test]
fn https_without_certificates_fails_validation() {
    let cli = Cli::try_parse_from([
        "devserve",
        "HTTPS",
        "--cert",
        "/nonexistent/a.crt",
        "--key",
        "/nonexistent/a.key",
    ])
    .unwrap();
    let err = resolve(&cli).unwrap_err();
    assert!(matches!(err, DevserveError::ConfigValidation { ref errors } if errors.len() == 2));
}

#[test]
fn missing_explicit_config_is_reported() {
    let err = load_file(Some(Path::new("demos/absent.yaml"))).unwrap_err();
    assert!(matches!(err, DevserveError::ConfigFileNotFound { ref path } if *path == PathBuf::from("demos/absent.yaml")));
}
