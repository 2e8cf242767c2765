//! mt700-relay - MT700 composition relay
//!
//! Loads a purchase order and a proforma invoice from the trade-document
//! backend, extracts the sales-agreement note, and forwards both ids plus the
//! note to the backend's MT700 synthesis endpoint. Served over plain HTTP and
//! as an MCP tool.

pub mod backend;
pub mod compose;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod mcp;
pub mod router;
pub mod state;
pub mod telemetry;

// Re-export key types for convenience
pub use backend::{BackendClient, ComposedRequest, DocumentKind, DocumentRef};
pub use compose::Mt700Composer;
pub use config::Config;
pub use error::{AppError, Result};
pub use extract::{decode_embedded_json, extract_sales_agreement};
pub use handlers::{generate_mt700_handler, health_handler, ready_handler};
pub use router::{build_router, serve_with_drain};
pub use state::AppState;
