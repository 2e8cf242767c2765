//! Wire-level types and fixed addresses of the trade-document backend.

use serde::Serialize;
use std::fmt;

/// Path of the document-load endpoint, relative to the backend base URL.
pub const DOCUMENT_LOAD_PATH: &str = "/api/mywave/trade/document/load";

/// Path of the MT700 synthesis endpoint, relative to the backend base URL.
pub const MT700_SYNTHESIS_PATH: &str = "/api/mywave/chatgpt/mt700withreference";

/// The backend rejects requests without a browser-like agent.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PurchaseOrder,
    Invoice,
}

impl DocumentKind {
    /// Value of the `type` query parameter understood by the document store.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::PurchaseOrder => "purchaseorder",
            DocumentKind::Invoice => "invoice",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier plus kind of a document to load. Only lives for one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: String,
    pub kind: DocumentKind,
}

impl DocumentRef {
    pub fn purchase_order(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: DocumentKind::PurchaseOrder,
        }
    }

    pub fn invoice(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: DocumentKind::Invoice,
        }
    }
}

/// Body of the synthesis call. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedRequest {
    #[serde(rename = "PURCHASEORDER")]
    pub purchase_order_id: String,
    #[serde(rename = "PROFORMAINVOICE")]
    pub proforma_invoice_id: String,
    #[serde(rename = "SalesAgreement")]
    pub sales_agreement_note: String,
}
