//! Telemetry initialization and API call span helpers.

use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Initialize `tracing` and format developer logs.
///
/// Logs go to stderr; stdout carries the MCP transport.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper to record start and finish of an outbound API call.
pub struct ApiCallSpan {
    span: Span,
    started_at: Instant,
    request_id: Uuid,
}

impl ApiCallSpan {
    /// Start a span for one outbound request.
    pub fn start(endpoint: &'static str) -> Self {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            target: "mallory_mcp::api",
            "api_call",
            %request_id,
            endpoint
        );
        Self {
            span,
            started_at: Instant::now(),
            request_id,
        }
    }

    /// Close the span while recording status and completion info.
    pub fn finish(self, status: &'static str, http_status: Option<u16>) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        info!(
            target: "mallory_mcp::api",
            request_id = %self.request_id,
            status = status,
            http_status = http_status,
            elapsed_ms = elapsed_ms,
            "Completed Mallory API call"
        );
    }
}

/// Payload for logging MCP runtime state as structured telemetry.
#[derive(Debug, Serialize)]
pub struct RuntimeModeTelemetry<'a> {
    pub transport: &'a str,
    pub host: Option<&'a str>,
    pub port: Option<u16>,
    pub config_path: &'a str,
    pub api_base_url: &'a str,
    pub instructions: &'a str,
    pub launch_args: &'a [String],
}

/// Emit runtime mode to `tracing`.
pub fn emit_runtime_mode(telemetry: &RuntimeModeTelemetry<'_>) {
    info!(
        target: "mallory_mcp::runtime",
        transport = telemetry.transport,
        host = telemetry.host.unwrap_or(""),
        port = telemetry.port.unwrap_or_default(),
        config_path = telemetry.config_path,
        api_base_url = telemetry.api_base_url,
        instructions = telemetry.instructions,
        launch_args = ?telemetry.launch_args,
        "Started MCP server"
    );
}
