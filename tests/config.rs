use agent2mcp::cli::Args;
use agent2mcp::config::{Config, FileConfig, DEFAULT_BASE_URL};
use std::fs;
use tempfile::TempDir;

fn args() -> Args {
    Args {
        base_url: None,
        verbose: false,
        skip_discovery: false,
        invoice: None,
    }
}

#[test]
fn yaml_config_file_parses() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("agent2mcp.yaml");
    fs::write(
        &path,
        "server:\n  base_url: http://mcp.internal:4000\n  stream_timeout: 10\nsession:\n  verbose: true\n",
    )
    .unwrap();

    let config = FileConfig::from_path(&path).unwrap();
    assert_eq!(
        config.server.base_url.as_deref(),
        Some("http://mcp.internal:4000")
    );
    assert_eq!(config.server.stream_timeout, Some(10));
    assert_eq!(config.session.verbose, Some(true));
}

#[test]
fn json_config_file_parses() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("agent2mcp.json");
    fs::write(&path, r#"{ "server": { "base_url": "http://mcp.internal:4000" } }"#).unwrap();

    let config = FileConfig::from_path(&path).unwrap();
    assert_eq!(
        config.server.base_url.as_deref(),
        Some("http://mcp.internal:4000")
    );
    assert_eq!(config.server.stream_timeout, None);
}

#[test]
fn partial_config_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("agent2mcp.yml");
    fs::write(&path, "session:\n  verbose: true\n").unwrap();

    let config = FileConfig::from_path(&path).unwrap();
    assert!(config.server.base_url.is_none());
    assert_eq!(config.session.verbose, Some(true));
}

#[test]
fn malformed_yaml_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("agent2mcp.yaml");
    fs::write(&path, "server: [not: a: mapping\n").unwrap();

    assert!(FileConfig::from_path(&path).is_err());
}

#[test]
fn missing_config_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("does-not-exist.yaml");
    assert!(FileConfig::from_path(&path).is_err());
}

#[test]
fn default_base_url_when_nothing_configured() {
    let config = Config::from_env_and_args(&args());
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.stream_timeout, 30);
    assert!(!config.verbose);
}

#[test]
fn cli_base_url_wins_and_trailing_slash_is_trimmed() {
    let mut cli = args();
    cli.base_url = Some("http://example.test:9000/".to_string());

    let config = Config::from_env_and_args(&cli);
    assert_eq!(config.base_url, "http://example.test:9000");
}

#[test]
fn cli_verbose_flag_wins() {
    let mut cli = args();
    cli.verbose = true;

    let config = Config::from_env_and_args(&cli);
    assert!(config.verbose);
}
