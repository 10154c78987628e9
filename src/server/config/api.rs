use std::path::Path;

use reqwest::Url;
use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.mallory.ai/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Mallory API settings.
#[derive(Debug, Clone)]
pub struct ApiSection {
    /// Absolute http(s) base URL without a trailing slash.
    pub base_url: String,
    /// API key from the config file; CLI and env overrides take precedence.
    pub key: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawApiSection {
    pub base_url: Option<String>,
    pub key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

pub fn parse_api_section(
    raw: Option<RawApiSection>,
    path: &Path,
) -> Result<ApiSection, ConfigError> {
    let api_raw = raw.unwrap_or_default();

    let base_url = normalize_base_url(
        api_raw
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        path,
    )?;

    let key = api_raw.key.filter(|value| !value.trim().is_empty());

    let timeout_secs = api_raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "api.timeout_secs",
            message: "Use a nonzero request timeout".into(),
        });
    }

    let user_agent = api_raw
        .user_agent
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(default_user_agent);

    Ok(ApiSection {
        base_url,
        key,
        timeout_secs,
        user_agent,
    })
}

fn default_user_agent() -> String {
    format!("mallory-mcp/{version}", version = env!("CARGO_PKG_VERSION"))
}

fn normalize_base_url(raw: String, path: &Path) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/').to_string();
    let parsed = Url::parse(&trimmed).map_err(|err| ConfigError::InvalidField {
        path: path.to_path_buf(),
        field: "api.base_url",
        message: err.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed),
        other => Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "api.base_url",
            message: format!("Use an http or https URL, not `{other}`"),
        }),
    }
}
