//! Server modules: configuration, startup guards, and the MCP runtime.

pub mod auth;
pub mod config;
pub mod runtime;
