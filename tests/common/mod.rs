//! Shared test fixtures: an in-process stand-in for the trade-document
//! backend that records every call it receives.

#![allow(dead_code)]

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use mt700_relay::{build_router, AppState, Config};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const DOCUMENT_LOAD_PATH: &str = "/api/mywave/trade/document/load";
pub const SYNTHESIS_PATH: &str = "/api/mywave/chatgpt/mt700withreference";

/// One request observed by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub document_id: Option<String>,
    pub document_type: Option<String>,
    pub user_agent: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone)]
struct Canned {
    status: StatusCode,
    body: String,
    delay: Duration,
}

impl Canned {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

#[derive(Default)]
struct MockState {
    calls: Mutex<Vec<RecordedCall>>,
    documents: Mutex<HashMap<String, VecDeque<Canned>>>,
    synthesis: Mutex<VecDeque<Canned>>,
}

/// Queued responses are served in order; the last one repeats forever.
fn next_response(queue: &mut VecDeque<Canned>) -> Option<Canned> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn load_document(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let document_id = params.get("documentId").cloned();
    let document_type = params.get("type").cloned();

    state.calls.lock().unwrap().push(RecordedCall {
        path: DOCUMENT_LOAD_PATH.to_string(),
        document_id: document_id.clone(),
        document_type: document_type.clone(),
        user_agent: header_value(&headers, header::USER_AGENT),
        content_type: header_value(&headers, header::CONTENT_TYPE),
        body: String::new(),
    });

    let key = document_key(
        document_type.as_deref().unwrap_or_default(),
        document_id.as_deref().unwrap_or_default(),
    );
    let canned = state
        .documents
        .lock()
        .unwrap()
        .get_mut(&key)
        .and_then(next_response);

    match canned {
        Some(canned) => {
            tokio::time::sleep(canned.delay).await;
            canned.into_response()
        }
        None => (StatusCode::NOT_FOUND, "document not found").into_response(),
    }
}

async fn synthesize(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.calls.lock().unwrap().push(RecordedCall {
        path: SYNTHESIS_PATH.to_string(),
        document_id: None,
        document_type: None,
        user_agent: header_value(&headers, header::USER_AGENT),
        content_type: header_value(&headers, header::CONTENT_TYPE),
        body,
    });

    let canned = next_response(&mut state.synthesis.lock().unwrap());
    match canned {
        Some(canned) => {
            tokio::time::sleep(canned.delay).await;
            canned.into_response()
        }
        None => (StatusCode::INTERNAL_SERVER_ERROR, "no synthesis configured").into_response(),
    }
}

fn document_key(document_type: &str, document_id: &str) -> String {
    format!("{}:{}", document_type, document_id)
}

pub struct MockBackend {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route(DOCUMENT_LOAD_PATH, post(load_document))
            .route(SYNTHESIS_PATH, post(synthesize))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Queue a response for `POST load?type=<document_type>&documentId=<id>`.
    pub fn document(&self, document_type: &str, id: &str, status: StatusCode, body: impl Into<String>) {
        self.document_delayed(document_type, id, status, body, Duration::ZERO);
    }

    pub fn document_delayed(
        &self,
        document_type: &str,
        id: &str,
        status: StatusCode,
        body: impl Into<String>,
        delay: Duration,
    ) {
        self.state
            .documents
            .lock()
            .unwrap()
            .entry(document_key(document_type, id))
            .or_default()
            .push_back(Canned {
                status,
                body: body.into(),
                delay,
            });
    }

    pub fn synthesis(&self, status: StatusCode, body: impl Into<String>) {
        self.state.synthesis.lock().unwrap().push_back(Canned {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        });
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Happy-path fixture: PO with the given note, an invoice, and a
    /// synthesis response.
    pub fn happy_path(&self, po: &str, inv: &str, note: &str, synthesis: &Value) {
        self.document("purchaseorder", po, StatusCode::OK, po_document(note));
        self.document(
            "invoice",
            inv,
            StatusCode::OK,
            json!({ "message": "{\"data\": \"{}\"}" }).to_string(),
        );
        self.synthesis(StatusCode::OK, synthesis.to_string());
    }
}

/// A purchase-order body with the note wrapped the way the document store
/// does it: `message` and `data` are both JSON-encoded strings.
pub fn po_document(note: &str) -> String {
    let data = json!({ "note": note }).to_string();
    let message = json!({ "data": data, "status": "loaded" }).to_string();
    json!({ "code": 200, "message": message }).to_string()
}

/// An address nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn relay_state(base_url: &str) -> Arc<AppState> {
    relay_state_with(base_url, |_| {})
}

pub fn relay_state_with<F>(base_url: &str, customize: F) -> Arc<AppState>
where
    F: FnOnce(&mut Config),
{
    let mut config = Config::for_backend(base_url);
    customize(&mut config);
    Arc::new(AppState::new(config).expect("Failed to create AppState"))
}

pub fn relay_app(base_url: &str) -> Router {
    build_router(relay_state(base_url))
}

/// Helper to make a request to the router and decode a JSON body.
/// Non-JSON bodies decode to `{}`.
pub async fn json_request(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, raw) = raw_request(app, method, uri, body.map(|b| b.to_string())).await;
    let body: Value = serde_json::from_str(&raw).unwrap_or(json!({}));
    (status, body)
}

pub async fn raw_request(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, String) {
    let req = match method {
        "GET" => Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
        "POST" => Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.unwrap_or_default()))
            .unwrap(),
        _ => panic!("Unsupported method"),
    };

    let response = app.oneshot(req).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&body_bytes).into_owned())
}

/// POST a JSON-RPC message to `/mcp` the way a streamable-HTTP client does
/// and return the status plus the JSON-RPC reply, if any. Replies may come
/// back as plain JSON or as a server-sent event stream.
pub async fn mcp_request(app: Router, message: Value) -> (StatusCode, Option<Value>) {
    let req = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/json, text/event-stream")
        .body(Body::from(message.to_string()))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let raw = String::from_utf8_lossy(&body_bytes);

    (status, parse_rpc_reply(&raw))
}

fn parse_rpc_reply(raw: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return Some(value);
    }
    raw.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
        .filter(|data| !data.is_empty())
        .filter_map(|data| serde_json::from_str::<Value>(data).ok())
        .find(|value| value.get("result").is_some() || value.get("error").is_some())
}
