use std::{
    process::{Command as StdCommand, Stdio},
    time::Duration,
};

use anyhow::Result;
use rmcp::{model::ClientInfo, serve_client};
use tokio::time::timeout;

use crate::common::{spawn_server_process, write_config, BINARY_PATH, VALID_KEY};

#[tokio::test]
async fn inspector_style_spawn_lists_tools() -> Result<()> {
    let (_config_dir, config_path) = write_config("https://api.mallory.example/v1")?;
    let (mut child, transport, stderr_task) = spawn_server_process(&config_path).await?;

    let client = serve_client(ClientInfo::default(), transport).await?;
    let list = client.list_tools(None).await?;
    assert!(
        list.tools
            .iter()
            .any(|tool| tool.name.as_ref() == "health_check"),
        "list_tools should include health_check: {:?}",
        list.tools
    );

    client.cancel().await?;
    let status = timeout(Duration::from_secs(5), child.wait()).await??;
    assert!(
        status.success(),
        "server should exit cleanly but exit status was {status:?}"
    );
    if let Some(handle) = stderr_task {
        let _ = handle.await;
    }
    Ok(())
}

#[test]
fn direct_execution_requires_mcp_client() {
    use std::io::IsTerminal;
    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        eprintln!("Skipping MCP_CLIENT_REQUIRED test because stdio is not a TTY");
        return;
    }
    let (_config_dir, config_path) =
        write_config("https://api.mallory.example/v1").expect("config should be written");
    let status = StdCommand::new(BINARY_PATH)
        .env("MCP_CONFIG_PATH", &config_path)
        .env("MALLORY_API_KEY", VALID_KEY)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .stdin(Stdio::inherit())
        .status()
        .expect("process should start");
    assert_eq!(
        status.code(),
        Some(44),
        "MCP_CLIENT_REQUIRED exit code (44) expected, got {status:?}"
    );
}
