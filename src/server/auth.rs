//! API-key resolution and MCP-client checks performed at startup.
use std::process::ExitCode;

use serde_json::json;

use super::runtime::RuntimeExit;
use crate::{
    cli::{normalize_api_key, ApiKeySource, LaunchProfile},
    lib::errors::{
        ToolErrorDescriptorBuilder, API_KEY_REQUIRED_ERROR, MCP_CLIENT_REQUIRED_ERROR,
    },
};

/// Resolution status for the effective API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyStatus {
    Resolved,
    Missing,
}

/// Combines the launch-profile key override with the config-file key.
///
/// An absent key is a configuration error caught here; an *invalid* key is
/// only discoverable by calling the API and surfaces per tool call.
#[derive(Debug, Clone)]
pub struct ApiKeyContext {
    override_key: Option<String>,
    override_source: ApiKeySource,
    config_key: Option<String>,
}

impl ApiKeyContext {
    pub fn new(
        override_key: Option<String>,
        override_source: ApiKeySource,
        config_key: Option<String>,
    ) -> Self {
        Self {
            override_key,
            override_source,
            config_key,
        }
    }

    /// Effective key and its source: CLI/env override first, then config.
    pub fn resolved(&self) -> Option<(String, ApiKeySource)> {
        if let Some(key) = &self.override_key {
            return Some((key.clone(), self.override_source));
        }
        self.config_key
            .as_deref()
            .and_then(normalize_api_key)
            .map(|key| (key, ApiKeySource::Config))
    }

    pub fn status(&self) -> ApiKeyStatus {
        match self.resolved() {
            Some(_) => ApiKeyStatus::Resolved,
            None => ApiKeyStatus::Missing,
        }
    }

    /// Return the effective key or a structured `RuntimeExit`.
    pub fn ensure_configured(&self) -> Result<(String, ApiKeySource), RuntimeExit> {
        self.resolved().ok_or_else(|| {
            build_startup_exit(
                API_KEY_REQUIRED_ERROR.builder(),
                ExitCode::from(43),
                43,
                true,
                json!({ "key_source": format!("{:?}", self.override_source) }),
            )
        })
    }
}

/// Refuse to run on a TTY; stdout belongs to the MCP transport.
pub fn ensure_invoked_via_mcp_client(profile: &LaunchProfile) -> Result<(), RuntimeExit> {
    use std::io::IsTerminal;
    let stdin_tty = std::io::stdin().is_terminal();
    let stdout_tty = std::io::stdout().is_terminal();
    if stdin_tty || stdout_tty {
        return Err(build_startup_exit(
            MCP_CLIENT_REQUIRED_ERROR.builder(),
            ExitCode::from(44),
            44,
            true,
            json!({
                "transport": profile.transport.as_str(),
                "stdin_is_tty": stdin_tty,
                "stdout_is_tty": stdout_tty
            }),
        ));
    }
    Ok(())
}

fn build_startup_exit(
    builder: ToolErrorDescriptorBuilder<'static>,
    exit_code: ExitCode,
    exit_code_raw: u8,
    retryable: bool,
    details: serde_json::Value,
) -> RuntimeExit {
    let data = builder
        .retryable(retryable)
        .details(details)
        .with_exit_code_value(exit_code_raw)
        .build()
        .expect("startup guard builder must succeed");
    RuntimeExit::structured(data, exit_code)
}
