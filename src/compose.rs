use crate::backend::types::DOCUMENT_LOAD_PATH;
use crate::backend::{BackendClient, ComposedRequest, DocumentRef};
use crate::error::Result;
use crate::extract::extract_sales_agreement;
use serde_json::Value;
use std::time::Instant;

/// Orchestrates the fetch / extract / fetch / synthesize pipeline.
///
/// Every step runs to completion before the next starts, and the first error
/// aborts the rest. Nothing is memoized between calls.
pub struct Mt700Composer {
    backend: BackendClient,
    log_payloads: bool,
}

impl Mt700Composer {
    pub fn new(backend: BackendClient, log_payloads: bool) -> Self {
        Self {
            backend,
            log_payloads,
        }
    }

    /// Compose an MT700 response for a purchase order and a proforma invoice.
    ///
    /// # Flow
    /// 1. Load the purchase order (`purchaseorder`)
    /// 2. Extract its sales-agreement note
    /// 3. Load the invoice (`invoice`); the body is not used further
    /// 4. POST identifiers and note to the synthesis endpoint
    ///
    /// Returns the synthesis body unmodified.
    pub async fn compose(&self, po_number: &str, inv_number: &str) -> Result<Value> {
        let start = Instant::now();
        metrics::counter!("mt700_requests_total").increment(1);

        let result = self.run_pipeline(po_number, inv_number).await;

        match &result {
            Ok(response) => {
                if self.log_payloads {
                    tracing::info!(
                        po_number,
                        inv_number,
                        response = %response,
                        "Generated MT700 response"
                    );
                } else {
                    tracing::info!(po_number, inv_number, "Generated MT700 response");
                }
                metrics::histogram!("mt700_latency_ms").record(start.elapsed().as_millis() as f64);
            }
            Err(e) => {
                tracing::error!(
                    po_number,
                    inv_number,
                    kind = e.kind(),
                    error = %e,
                    "Failed to generate MT700 response"
                );
                metrics::counter!("mt700_failures_total", "kind" => e.kind()).increment(1);
            }
        }

        result
    }

    async fn run_pipeline(&self, po_number: &str, inv_number: &str) -> Result<Value> {
        let po_document = self
            .backend
            .load(DOCUMENT_LOAD_PATH, &DocumentRef::purchase_order(po_number))
            .await?;

        let sales_agreement = extract_sales_agreement(&po_document)?;

        // The invoice must load, but only its number goes into the payload.
        let _invoice = self
            .backend
            .load(DOCUMENT_LOAD_PATH, &DocumentRef::invoice(inv_number))
            .await?;

        let request = ComposedRequest {
            purchase_order_id: po_number.to_string(),
            proforma_invoice_id: inv_number.to_string(),
            sales_agreement_note: sales_agreement,
        };

        self.backend.synthesize(&request).await
    }
}
