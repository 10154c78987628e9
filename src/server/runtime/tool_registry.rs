use std::sync::Arc;

use rmcp::{
    handler::server::ServerHandler,
    model::{ErrorData, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, Json,
};

use crate::{
    lib::api::MalloryClient,
    tools::{
        self,
        health::{self, HealthCheckResponse},
        ServerToolRouter,
    },
};

/// MCP server context owning the shared Mallory client handle.
///
/// Replaces the process-wide singletons of earlier revisions: the client is
/// constructed once in [`crate::server::runtime::run_server`] and handed to
/// every invocation through this context.
#[derive(Clone)]
pub struct MalloryServer {
    instructions: Arc<String>,
    client: Arc<MalloryClient>,
    tool_router: ServerToolRouter<Self>,
}

impl MalloryServer {
    pub fn new(instructions: String, client: MalloryClient) -> Self {
        let router = tools::build_router(Self::tool_router);
        Self {
            instructions: Arc::new(instructions),
            client: Arc::new(client),
            tool_router: router,
        }
    }
}

#[tool_router(router = tool_router)]
impl MalloryServer {
    #[tool(
        name = "health_check",
        description = "Check Mallory API connectivity, verify the API key is valid, and return the current user (uuid, email, first_name, last_name). If authentication fails, the user field carries an error message instead."
    )]
    async fn health_check(&self) -> Result<Json<HealthCheckResponse>, ErrorData> {
        match health::run_health_check(self.client.as_ref()).await {
            Ok(response) => Ok(Json(response)),
            Err(err) => Err(health::api_error_to_error_data(err)),
        }
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for MalloryServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some((*self.instructions).clone()),
            ..ServerInfo::default()
        }
    }
}
