//! Sales-agreement extraction from purchase-order documents.
//!
//! The document store wraps its payload twice: `message` holds a JSON
//! string whose object has a `data` field, itself a JSON string, whose object
//! carries the `note`. Each layer is decoded explicitly and any deviation is
//! an error.

use crate::error::{AppError, Result};
use serde_json::Value;

/// Read `field` from `parent`, require it to be a string, and parse that
/// string as JSON.
pub fn decode_embedded_json(parent: &Value, field: &str) -> Result<Value> {
    let raw = parent.get(field).ok_or_else(|| AppError::MalformedDocument {
        field: field.to_string(),
        reason: "field is missing".to_string(),
    })?;

    let encoded = raw.as_str().ok_or_else(|| AppError::MalformedDocument {
        field: field.to_string(),
        reason: format!("expected a JSON-encoded string, found {}", json_type(raw)),
    })?;

    serde_json::from_str(encoded).map_err(|e| AppError::MalformedDocument {
        field: field.to_string(),
        reason: format!("invalid embedded JSON: {}", e),
    })
}

/// Extract the sales-agreement note from a fetched purchase-order document.
pub fn extract_sales_agreement(po_document: &Value) -> Result<String> {
    let result = decode_embedded_json(po_document, "message")
        .and_then(|message| decode_embedded_json(&message, "data"))
        .and_then(|data| read_note(&data));

    match result {
        Ok(note) => {
            tracing::info!(sales_agreement = %note, "Extracted SalesAgreement");
            Ok(note)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to extract SalesAgreement");
            Err(e)
        }
    }
}

fn read_note(data: &Value) -> Result<String> {
    let note = data.get("note").ok_or_else(|| AppError::MalformedDocument {
        field: "note".to_string(),
        reason: "field is missing".to_string(),
    })?;

    note.as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::MalformedDocument {
            field: "note".to_string(),
            reason: format!("expected a string, found {}", json_type(note)),
        })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
