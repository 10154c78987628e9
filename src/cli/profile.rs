//! LaunchProfile and API-key/config resolution.
use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::ValueEnum;

const DEFAULT_CONFIG: &str = "config.toml";
const MIN_API_KEY_LENGTH: usize = 16;
const MAX_API_KEY_LENGTH: usize = 256;
const MCP_CONFIG_ENV: &str = "MCP_CONFIG_PATH";
const MALLORY_API_KEY_ENV: &str = "MALLORY_API_KEY";

/// MCP transport mode.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TransportMode {
    Stdio,
    Tcp,
}

impl TransportMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Stdio => "stdio",
            TransportMode::Tcp => "tcp",
        }
    }
}

/// Where the effective Mallory API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Cli,
    Env,
    Config,
    Missing,
}

/// Resolved launch profile.
#[derive(Debug, Clone)]
pub struct LaunchProfile {
    pub config_path: PathBuf,
    pub transport: TransportMode,
    pub api_key_override: Option<String>,
    pub key_source: ApiKeySource,
    pub launch_args: Vec<String>,
}

/// Resolve config path in the order: CLI override → env var → default.
pub fn resolve_config_path(override_path: Option<PathBuf>) -> Result<PathBuf> {
    let path = override_path
        .or_else(|| env::var_os(MCP_CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    if path.is_absolute() {
        return Ok(path);
    }

    let cwd = env::current_dir().context("failed to obtain current directory")?;
    Ok(cwd.join(path))
}

/// Resolve the API-key override in the order: CLI override → env var.
///
/// The `[api].key` config field is consulted later, once the config file is
/// loaded; [`ApiKeySource::Config`] is assigned at that point.
pub fn resolve_api_key(key_override: Option<String>) -> (Option<String>, ApiKeySource) {
    if let Some(key) = key_override.and_then(|v| normalize_api_key(&v)) {
        return (Some(key), ApiKeySource::Cli);
    }

    if let Some(env_key) = env::var(MALLORY_API_KEY_ENV)
        .ok()
        .and_then(|v| normalize_api_key(&v))
    {
        return (Some(env_key), ApiKeySource::Env);
    }

    (None, ApiKeySource::Missing)
}

/// Build launch arguments suitable for reproduction/logging.
pub fn build_launch_args(transport: TransportMode, config: &Path) -> Vec<String> {
    vec![
        format!("--transport={}", transport.as_str()),
        format!("--config={}", config.display()),
    ]
}

/// Trim and bounds-check a candidate key; malformed values are treated as absent.
pub fn normalize_api_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.len() < MIN_API_KEY_LENGTH || trimmed.len() > MAX_API_KEY_LENGTH {
        return None;
    }
    Some(trimmed.to_string())
}
