use crate::cli::Args;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_STREAM_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub stream_timeout: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Resolved runtime configuration for the client and the demo driver.
pub struct Config {
    pub base_url: String,
    pub stream_timeout: u64,
    pub verbose: bool,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Self {
        let file_config = FileConfig::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load config file, using defaults");
            FileConfig::default()
        });

        // Base URL: CLI args > env var > config file > default
        let base_url = args
            .base_url
            .clone()
            .or_else(|| env::var("MCP_BASE_URL").ok())
            .or(file_config.server.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();

        // Stream timeout: env var > config file > default
        let stream_timeout = env::var("MCP_STREAM_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .or(file_config.server.stream_timeout)
            .unwrap_or(DEFAULT_STREAM_TIMEOUT_SECS);

        // Verbose flag: CLI args > env var > config file
        let verbose = args.verbose
            || env::var("MCP_VERBOSE")
                .ok()
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false)
            || file_config.session.verbose.unwrap_or(false);

        Config {
            base_url,
            stream_timeout,
            verbose,
        }
    }

    /// First and last day of the current calendar year, as ISO dates.
    pub fn current_year_range() -> (String, String) {
        let year = chrono::Local::now().format("%Y");
        (format!("{}-01-01", year), format!("{}-12-31", year))
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::config_paths() {
            if path.exists() {
                return Self::from_path(&path);
            }
        }

        // No config file found, return default
        Ok(FileConfig::default())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str());
        if extension == Some("yaml") || extension == Some("yml") {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))
        }
    }

    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Current directory (highest priority - local override)
        paths.push(PathBuf::from(".agent2mcp.yaml"));
        paths.push(PathBuf::from(".agent2mcp.yml"));
        paths.push(PathBuf::from(".agent2mcp.json"));

        // 2. User's config directory (global config)
        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("agent2mcp");
            paths.push(config_dir.join("agent2mcp.yaml"));
            paths.push(config_dir.join("agent2mcp.yml"));
            paths.push(config_dir.join("agent2mcp.json"));
        }

        paths
    }
}
