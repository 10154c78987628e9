use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Output of `health_check`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HealthCheckResponse {
    /// Health-status payload returned by the API, verbatim.
    pub api: Value,
    /// Identity payload, or an inline error when authentication failed.
    pub user: UserStatus,
}

/// Identity half of the health-check result.
///
/// Serializes either as the API's user payload or as `{"error": "..."}`
/// when the identity lookup failed but the API itself is reachable.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(untagged)]
pub enum UserStatus {
    Unavailable { error: String },
    Identity(Value),
}
