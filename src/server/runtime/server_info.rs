use crate::{cli::LaunchProfile, server::config::ServerConfig};

/// Build the `ServerInfo.instructions` string shown to MCP clients.
pub fn build_instructions(profile: &LaunchProfile, config: &ServerConfig) -> String {
    format!(
        "Mallory MCP server. Loaded config {path}; talking to {base_url}; waiting in {transport} mode (host={host}, port={port}). Call the health_check tool to verify connectivity and the active account.",
        path = config.source_path.display(),
        base_url = config.api.base_url,
        transport = profile.transport.as_str(),
        host = config.server.host,
        port = config.server.port
    )
}
