use crate::handlers::mt700::Mt700Query;
use crate::state::AppState;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;

pub const SERVER_NAME: &str = "PO_INV_MT700_MCP";
pub const SERVER_DESCRIPTION: &str = "MCP server for generating MT700 from PO and INV via hive.t";

/// MCP handler exposing the `generate_mt700` tool.
///
/// Argument errors (unknown tool, missing or mistyped fields) are rejected by
/// the tool router as JSON-RPC invalid params. Pipeline failures come back as
/// a tool result with `isError: true`.
#[derive(Clone)]
pub struct Mt700McpServer {
    state: Arc<AppState>,
    tool_router: ToolRouter<Mt700McpServer>,
}

#[tool_router]
impl Mt700McpServer {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Generate an MT700 message from a purchase order and a proforma invoice")]
    async fn generate_mt700(
        &self,
        Parameters(args): Parameters<Mt700Query>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            po_number = %args.po_number,
            inv_number = %args.inv_number,
            "Received MCP tool call"
        );
        metrics::counter!("mcp_tool_calls_total").increment(1);

        let span = tracing::info_span!(
            "generate_mt700",
            po_number = %args.po_number,
            inv_number = %args.inv_number
        );
        let result = self
            .state
            .composer
            .compose(&args.po_number, &args.inv_number)
            .instrument(span)
            .await;

        Ok(match result {
            Ok(output) => tool_output(output),
            Err(e) => CallToolResult::error(vec![Content::text(e.to_string())]),
        })
    }
}

#[tool_handler]
impl ServerHandler for Mt700McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(SERVER_DESCRIPTION.to_string()),
            ..Default::default()
        }
    }
}

/// structuredContent must be an object, so other shapes go out as text only.
fn tool_output(output: Value) -> CallToolResult {
    if output.is_object() {
        CallToolResult::structured(output)
    } else {
        CallToolResult::success(vec![Content::text(output.to_string())])
    }
}
