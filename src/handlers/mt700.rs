use crate::error::Result;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use rmcp::schemars;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;

/// Identifiers accepted by both the HTTP endpoint and the MCP tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct Mt700Query {
    /// Purchase order document id
    pub po_number: String,
    /// Proforma invoice document id
    pub inv_number: String,
}

/// GET /generate_mt700 - Compose an MT700 for a purchase order and invoice.
///
/// Both parameters are opaque and required; a missing one is rejected by the
/// query extractor with 400. Pipeline failures map to 502.
pub async fn generate_mt700_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<Mt700Query>,
) -> Result<Json<Value>> {
    tracing::info!(
        po_number = %query.po_number,
        inv_number = %query.inv_number,
        "Received request"
    );

    let span = tracing::info_span!(
        "generate_mt700",
        po_number = %query.po_number,
        inv_number = %query.inv_number
    );
    let response = state
        .composer
        .compose(&query.po_number, &query.inv_number)
        .instrument(span)
        .await?;

    Ok(Json(response))
}
