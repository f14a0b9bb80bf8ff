//! HTTP transport for the IMDb GraphQL endpoint.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{
    ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, RETRY_AFTER, USER_AGENT,
};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::TransportError;
use crate::operation::{GraphqlRequest, GraphqlResponse};
use crate::retry::{RetryDecision, RetryPolicy};
use crate::transport::Transport;

/// Default GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.graphql.imdb.com/";

/// Default user agent.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:47.0) Gecko/20100101 Firefox/47.0";

/// Transport metrics.
#[derive(Debug, Default)]
#[allow(clippy::struct_field_names)]
pub struct HttpTransportMetrics {
    requests_total: AtomicU64,
    requests_success: AtomicU64,
    requests_error: AtomicU64,
    requests_retried: AtomicU64,
}

impl HttpTransportMetrics {
    /// Snapshot current metrics.
    #[must_use]
    pub fn snapshot(&self) -> HttpTransportMetricsSnapshot {
        HttpTransportMetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_success: self.requests_success.load(Ordering::Relaxed),
            requests_error: self.requests_error.load(Ordering::Relaxed),
            requests_retried: self.requests_retried.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_field_names)]
pub struct HttpTransportMetricsSnapshot {
    /// HTTP attempts sent.
    pub requests_total: u64,
    /// Requests that produced data.
    pub requests_success: u64,
    /// Requests that failed.
    pub requests_error: u64,
    /// Retries performed.
    pub requests_retried: u64,
}

/// HTTP proxy settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    /// Proxy host name.
    pub host: String,
    /// Proxy port.
    pub port: u16,
    /// Basic-auth user, if the proxy requires login.
    pub user: Option<String>,
    /// Basic-auth password.
    pub password: String,
}

/// HTTP transport configuration.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Default headers applied to every request.
    pub headers: HeaderMap,
    /// Request timeout.
    pub timeout: Duration,
    /// Retry policy.
    pub retry: RetryPolicy,
    /// Optional HTTP proxy.
    pub proxy: Option<ProxySettings>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        Self {
            headers,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            proxy: None,
        }
    }
}

/// HTTP transport builder.
#[derive(Debug, Clone)]
pub struct HttpTransportBuilder {
    endpoint: String,
    config: HttpTransportConfig,
}

impl HttpTransportBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            config: HttpTransportConfig::default(),
        }
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.config.headers.insert(name, value);
        self
    }

    /// Override the user agent.
    pub fn with_user_agent(self, agent: &str) -> Result<Self, TransportError> {
        Ok(self.with_header(USER_AGENT, header_value("user agent", agent)?))
    }

    /// Request localized data (`Accept-Language`).
    pub fn with_language(self, language: &str) -> Result<Self, TransportError> {
        Ok(self.with_header(ACCEPT_LANGUAGE, header_value("language", language)?))
    }

    /// Set the originating client address (`X-Forwarded-For`).
    pub fn with_forwarded_for(self, address: &str) -> Result<Self, TransportError> {
        Ok(self.with_header(
            HeaderName::from_static("x-forwarded-for"),
            header_value("ip address", address)?,
        ))
    }

    /// Set timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    /// Route requests through an HTTP proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: ProxySettings) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<HttpTransport, TransportError> {
        HttpTransport::with_config(self.endpoint, self.config)
    }
}

fn header_value(what: &str, value: &str) -> Result<HeaderValue, TransportError> {
    HeaderValue::from_str(value).map_err(|err| TransportError::Protocol {
        message: format!("invalid {what} header: {err}"),
    })
}

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    http: reqwest::Client,
    config: HttpTransportConfig,
    metrics: Arc<HttpTransportMetrics>,
}

impl HttpTransport {
    /// Create a transport with custom configuration.
    pub fn with_config(
        endpoint: impl Into<String>,
        config: HttpTransportConfig,
    ) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .default_headers(config.headers.clone())
            .timeout(config.timeout);
        if let Some(proxy) = &config.proxy {
            let mut proxy_config =
                reqwest::Proxy::all(format!("http://{}:{}", proxy.host, proxy.port))?;
            if let Some(user) = &proxy.user {
                proxy_config = proxy_config.basic_auth(user, &proxy.password);
            }
            builder = builder.proxy(proxy_config);
        }
        Ok(Self {
            endpoint: endpoint.into(),
            http: builder.build()?,
            config,
            metrics: Arc::new(HttpTransportMetrics::default()),
        })
    }

    /// Endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Return transport metrics snapshot.
    #[must_use]
    pub fn metrics(&self) -> HttpTransportMetricsSnapshot {
        self.metrics.snapshot()
    }

    async fn send_with_retry(&self, body_bytes: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let mut attempt = 1;
        loop {
            match self.send_once(&body_bytes).await {
                Ok(bytes) => return Ok(bytes),
                Err(err) => match self.config.retry.decide(&err, attempt) {
                    RetryDecision::RetryAfter(delay) => {
                        self.metrics
                            .requests_retried
                            .fetch_add(1, Ordering::Relaxed);
                        warn!(
                            attempt,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            error = %err,
                            "retrying GraphQL request"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    RetryDecision::DoNotRetry => return Err(err),
                },
            }
        }
    }

    async fn send_once(&self, body_bytes: &[u8]) -> Result<Vec<u8>, TransportError> {
        self.metrics.requests_total.fetch_add(1, Ordering::Relaxed);
        let response = self
            .http
            .post(&self.endpoint)
            .body(body_bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                status,
                body: truncate_body(&bytes),
                retry_after,
            });
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all, fields(operation = %request.operation_name))]
    async fn execute(&self, request: &GraphqlRequest) -> Result<Value, TransportError> {
        let started = Instant::now();
        let body = serde_json::to_vec(request)?;
        let result = self.send_with_retry(body).await.and_then(|bytes| {
            let response: GraphqlResponse<Value> = serde_json::from_slice(&bytes)?;
            if !response.errors.is_empty() {
                return Err(TransportError::GraphqlErrors {
                    errors: response.errors,
                });
            }
            response.data.ok_or_else(|| TransportError::Protocol {
                message: "missing GraphQL data".to_string(),
            })
        });

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(_) => {
                self.metrics
                    .requests_success
                    .fetch_add(1, Ordering::Relaxed);
                debug!(duration_ms, "GraphQL request completed");
            }
            Err(err) => {
                self.metrics.requests_error.fetch_add(1, Ordering::Relaxed);
                warn!(duration_ms, error = %err, "GraphQL request failed");
            }
        }
        result
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let header = headers.get(RETRY_AFTER)?;
    let value = header.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

fn truncate_body(bytes: &[u8]) -> String {
    const MAX_LEN: usize = 4096;
    let mut body = String::from_utf8_lossy(bytes).to_string();
    if body.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}
