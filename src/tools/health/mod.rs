//! MCP tool for Mallory API health and authentication verification.

pub mod check;
pub mod response;

pub use check::{api_error_to_error_data, run_health_check, HEALTH_CHECK_TOOL_ID};
pub use response::{HealthCheckResponse, UserStatus};
