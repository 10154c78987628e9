use tracing::{debug, info};

use super::{ServerConfig, CONFIG_ENV_KEY, DEFAULT_CONFIG_PATH};

pub fn log_env_source(path: &std::path::Path, from_env: bool) {
    if from_env {
        info!(
            target: "mallory_mcp::config",
            path = %path.display(),
            "Loading configuration using MCP_CONFIG_PATH environment variable"
        );
    } else {
        debug!(
            target: "mallory_mcp::config",
            path = %path.display(),
            env = CONFIG_ENV_KEY,
            default = DEFAULT_CONFIG_PATH,
            "MCP_CONFIG_PATH not set; using default config.toml"
        );
    }
}

/// The API key itself is never logged, only whether one is present.
pub fn log_loaded(config: &ServerConfig) {
    info!(
        target: "mallory_mcp::config",
        path = %config.source_path.display(),
        host = %config.server.host,
        port = config.server.port,
        api_base_url = %config.api.base_url,
        api_timeout_secs = config.api.timeout_secs,
        api_key_in_config = config.api.key.is_some(),
        "Configuration file loaded successfully"
    );
}
