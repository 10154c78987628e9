use std::process::{Command as StdCommand, Stdio};

use anyhow::Result;

use crate::common::{write_config, BINARY_PATH};

#[test]
fn missing_api_key_causes_api_key_required_exit() -> Result<()> {
    let (_config_dir, config_path) = write_config("https://api.mallory.example/v1")?;
    let status = StdCommand::new(BINARY_PATH)
        .env("MCP_CONFIG_PATH", &config_path)
        .env_remove("MALLORY_API_KEY")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .status()
        .expect("process should start");
    assert_eq!(
        status.code(),
        Some(43),
        "API_KEY_REQUIRED exit code (43) expected"
    );
    Ok(())
}

#[test]
fn malformed_env_key_counts_as_missing() -> Result<()> {
    let (_config_dir, config_path) = write_config("https://api.mallory.example/v1")?;
    let status = StdCommand::new(BINARY_PATH)
        .env("MCP_CONFIG_PATH", &config_path)
        .env("MALLORY_API_KEY", "short")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .status()
        .expect("process should start");
    assert_eq!(
        status.code(),
        Some(43),
        "API_KEY_REQUIRED exit code (43) expected for a malformed key"
    );
    Ok(())
}
