use std::env;
use std::time::Duration;

/// Base address of the trade-document backend (document store and synthesis).
pub const DEFAULT_BACKEND_BASE_URL: &str = "http://20.8.88.74:7081";

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.to_lowercase().as_str() {
            "text" | "pretty" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown LOG_FORMAT '{}', expected 'text' or 'json'", other),
        }
    }
}

/// Logging settings, applied once at process start.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// EnvFilter directive used when `RUST_LOG` is unset.
    pub default_filter: String,
    pub format: LogFormat,
}

/// Retry settings for outbound calls. `max_retries = 0` disables retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_backoff_ms: 500,
            max_backoff_ms: 5000,
        }
    }
}

pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend_base_url: String,
    /// Per-request timeout for outbound calls. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// Connect timeout for outbound calls. `None` waits indefinitely.
    pub connect_timeout: Option<Duration>,
    pub retry: RetryConfig,
    /// Dump full fetched and synthesized payloads in info logs.
    pub log_payloads: bool,
    pub log: LogConfig,
    pub shutdown_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables with defaults matching
    /// the original deployment (localhost:8000, fixed backend address,
    /// unbounded waits, no retries).
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let backend_base_url = get("BACKEND_BASE_URL", DEFAULT_BACKEND_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        if !backend_base_url.starts_with("http://") && !backend_base_url.starts_with("https://") {
            anyhow::bail!(
                "BACKEND_BASE_URL must be an http(s) URL, got '{}'",
                backend_base_url
            );
        }

        let request_timeout = var("REQUEST_TIMEOUT_SECS")
            .map(|s| s.parse::<u64>())
            .transpose()?
            .map(Duration::from_secs);
        let connect_timeout = var("CONNECT_TIMEOUT_SECS")
            .map(|s| s.parse::<u64>())
            .transpose()?
            .map(Duration::from_secs);

        let retry = RetryConfig {
            max_retries: get("MAX_RETRIES", "0").parse()?,
            initial_backoff_ms: get("RETRY_BACKOFF_MS", "500").parse()?,
            max_backoff_ms: get("RETRY_MAX_BACKOFF_MS", "5000").parse()?,
        };

        Ok(Self {
            host: get("HOST", "127.0.0.1"),
            port: get("PORT", "8000").parse()?,
            backend_base_url,
            request_timeout,
            connect_timeout,
            retry,
            log_payloads: parse_bool(&get("LOG_PAYLOADS", "true"))?,
            log: LogConfig {
                default_filter: "mt700_relay=info,tower_http=info".to_string(),
                format: LogFormat::parse(&get("LOG_FORMAT", "text"))?,
            },
            shutdown_timeout_secs: get("SHUTDOWN_TIMEOUT", "5").parse()?,
        })
    }

    /// Configuration pointing at a specific backend, everything else default.
    pub fn for_backend(base_url: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            backend_base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: None,
            connect_timeout: None,
            retry: RetryConfig::default(),
            log_payloads: true,
            log: LogConfig {
                default_filter: "mt700_relay=info".to_string(),
                format: LogFormat::Text,
            },
            shutdown_timeout_secs: 0,
        }
    }
}

fn parse_bool(raw: &str) -> anyhow::Result<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("Expected a boolean, got '{}'", other),
    }
}
