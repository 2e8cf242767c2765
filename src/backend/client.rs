use crate::backend::retry::{RetryPolicy, Retryable};
use crate::backend::types::{
    ComposedRequest, DocumentRef, BROWSER_USER_AGENT, MT700_SYNTHESIS_PATH,
};
use crate::config::Config;
use crate::error::{AppError, Result};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;

/// Failure of a single outbound attempt, before it is mapped to an `AppError`.
#[derive(Debug)]
enum SendError {
    Transport(reqwest::Error),
    Status(StatusCode),
    Decode(reqwest::Error),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Transport(e) => write!(f, "request failed: {}", e),
            SendError::Status(status) => write!(f, "HTTP {}", status),
            SendError::Decode(e) => write!(f, "invalid JSON response: {}", e),
        }
    }
}

impl Retryable for SendError {
    fn is_retryable(&self) -> bool {
        match self {
            SendError::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            SendError::Status(status) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            SendError::Decode(_) => false,
        }
    }
}

/// HTTP client for the trade-document backend.
///
/// Holds one `reqwest::Client` (and therefore one connection pool) for the
/// life of the process. Requests never run concurrently within a pipeline.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
    log_payloads: bool,
}

impl BackendClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        tracing::info!(
            base_url = %config.backend_base_url,
            request_timeout_secs = config.request_timeout.map(|d| d.as_secs()),
            max_retries = config.retry.max_retries,
            "Backend client initialized"
        );

        Ok(Self {
            http,
            base_url: config.backend_base_url.clone(),
            retry: RetryPolicy::from(&config.retry),
            log_payloads: config.log_payloads,
        })
    }

    /// Load a typed document reference from the document-load endpoint.
    pub async fn load(&self, endpoint: &str, document: &DocumentRef) -> Result<Value> {
        self.fetch_document(endpoint, &document.id, document.kind.as_str())
            .await
    }

    /// POST `{base}{endpoint}?documentId=..&type=..` and return the parsed body.
    ///
    /// Neither the id nor the type is validated. Any transport error,
    /// non-2xx status, or undecodable body is a `RemoteFetch` error.
    pub async fn fetch_document(
        &self,
        endpoint: &str,
        document_id: &str,
        document_type: &str,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        let http = &self.http;
        let url = url.as_str();

        let result = self
            .retry
            .run("document_fetch", move || async move {
                let response = http
                    .post(url)
                    .query(&[("documentId", document_id), ("type", document_type)])
                    .header(CONTENT_TYPE, "application/json")
                    .header(USER_AGENT, BROWSER_USER_AGENT)
                    .send()
                    .await
                    .map_err(SendError::Transport)?;
                read_json(response).await
            })
            .await;

        metrics::counter!("document_fetches_total", "type" => document_type.to_string())
            .increment(1);

        match result {
            Ok(data) => {
                if self.log_payloads {
                    tracing::info!(document_id, document_type, payload = %data, "Fetched document");
                } else {
                    tracing::info!(document_id, document_type, "Fetched document");
                }
                Ok(data)
            }
            Err(e) => {
                tracing::error!(document_id, document_type, error = %e, "Failed to fetch document");
                Err(AppError::RemoteFetch {
                    document_id: document_id.to_string(),
                    document_type: document_type.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// POST the composed request to the synthesis endpoint and return its
    /// body untouched.
    pub async fn synthesize(&self, request: &ComposedRequest) -> Result<Value> {
        let url = format!("{}{}", self.base_url, MT700_SYNTHESIS_PATH);
        let http = &self.http;
        let url = url.as_str();

        self.retry
            .run("mt700_synthesis", move || async move {
                let response = http
                    .post(url)
                    .header(USER_AGENT, BROWSER_USER_AGENT)
                    .json(request)
                    .send()
                    .await
                    .map_err(SendError::Transport)?;
                read_json(response).await
            })
            .await
            .map_err(|e| AppError::Synthesis {
                reason: e.to_string(),
            })
    }
}

async fn read_json(response: reqwest::Response) -> std::result::Result<Value, SendError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SendError::Status(status));
    }
    response.json::<Value>().await.map_err(SendError::Decode)
}
