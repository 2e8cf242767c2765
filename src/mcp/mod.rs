//! Model Context Protocol surface.
//!
//! Exposes the MT700 pipeline as a machine-discoverable tool, built on
//! `rmcp` and served over its streamable-HTTP transport at `/mcp`. The relay
//! keeps no state between calls, so the transport runs in stateless mode:
//! every POST gets a fresh handler and no session id is issued.

pub mod server;

use crate::state::AppState;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use server::Mt700McpServer;
use std::sync::Arc;

pub use server::{SERVER_DESCRIPTION, SERVER_NAME};

/// Build the tower service mounted at `/mcp`.
pub fn service(state: Arc<AppState>) -> StreamableHttpService<Mt700McpServer, LocalSessionManager> {
    let config = StreamableHttpServerConfig {
        stateful_mode: false,
        ..Default::default()
    };

    StreamableHttpService::new(
        move || Ok(Mt700McpServer::new(Arc::clone(&state))),
        LocalSessionManager::default().into(),
        config,
    )
}
