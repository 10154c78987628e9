use rmcp::model::ErrorData;
use serde_json::json;

use super::response::{HealthCheckResponse, UserStatus};
use crate::lib::{
    api::MalloryApi,
    errors::{ApiError, API_HEALTH_FAILED_ERROR},
};

pub const HEALTH_CHECK_TOOL_ID: &str = "health_check";

/// Run the health check against the API client.
///
/// A `health()` failure aborts the call and propagates to the protocol
/// error surface. A `whoami()` failure is absorbed into the `user` half of
/// the result, so a reachable API with bad credentials still yields a
/// usable response. The two calls are sequential, health first.
pub async fn run_health_check(client: &dyn MalloryApi) -> Result<HealthCheckResponse, ApiError> {
    let api_status = client.health().await?;

    let user = match client.whoami().await {
        Ok(identity) => UserStatus::Identity(identity),
        Err(err) => {
            tracing::warn!(
                target: "mallory_mcp::tools",
                error = %err,
                "whoami failed; reporting degraded identity"
            );
            UserStatus::Unavailable {
                error: err.to_string(),
            }
        }
    };

    Ok(HealthCheckResponse {
        api: api_status,
        user,
    })
}

/// Map a fatal health-check failure onto the protocol error surface.
pub fn api_error_to_error_data(err: ApiError) -> ErrorData {
    let mut builder = API_HEALTH_FAILED_ERROR
        .builder()
        .retryable(err.is_retryable())
        .details(json!({ "reason": err.to_string() }));
    if let Some(endpoint) = err.endpoint() {
        builder = builder.with_context_field("endpoint", json!(endpoint));
    }
    builder
        .build()
        .expect("health error builder must succeed")
}
