use crate::handlers::{generate_mt700_handler, health_handler, ready_handler, root_handler};
use crate::mcp;
use crate::state::AppState;
use axum::{routing::get, Router};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build the application router without the metrics endpoint, which needs
/// the process-wide Prometheus handle.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/generate_mt700", get(generate_mt700_handler))
        .nest_service("/mcp", mcp::service(Arc::clone(&state)))
        // Health endpoints
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        // Middleware
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Serve `app` until `signal` resolves, then stop accepting connections and
/// give in-flight requests at most `drain_timeout` to finish.
///
/// Returns once every connection has closed or the drain window has elapsed,
/// whichever comes first. Requests still running at that point are dropped.
pub async fn serve_with_drain<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    drain_timeout: Duration,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let draining = Arc::new(Notify::new());
    let notify = Arc::clone(&draining);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        signal.await;
        notify.notify_one();
    });

    tokio::select! {
        result = server => {
            result?;
            tracing::info!("Server shutdown complete");
        }
        _ = async {
            draining.notified().await;
            tokio::time::sleep(drain_timeout).await;
        } => {
            tracing::warn!(
                timeout_ms = drain_timeout.as_millis() as u64,
                "Drain timeout elapsed, abandoning in-flight requests"
            );
        }
    }

    Ok(())
}
