//! Shared library modules providing the API client, error types, and telemetry initialization.

pub mod api;
pub mod errors;
pub mod telemetry;
