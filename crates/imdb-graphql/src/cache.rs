//! Response cache decorator.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::error::TransportError;
use crate::operation::GraphqlRequest;
use crate::transport::Transport;

/// Storage for successful response payloads, keyed by request.
pub trait ResponseCache: Send + Sync {
    /// Look up a stored payload.
    fn get(&self, key: &str) -> Result<Option<Value>, TransportError>;

    /// Store a payload.
    fn put(&self, key: &str, data: &Value) -> Result<(), TransportError>;
}

/// Unbounded in-process cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored payloads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<Value>, TransportError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &str, data: &Value) -> Result<(), TransportError> {
        self.entries.write().insert(key.to_string(), data.clone());
        Ok(())
    }
}

/// Cache key for a request: operation name, full query text and variables.
///
/// The key holds the whole request, so distinct requests never share an entry.
#[must_use]
pub fn cache_key(request: &GraphqlRequest) -> String {
    Value::Array(vec![
        Value::String(request.operation_name.clone()),
        Value::String(request.query.clone()),
        Value::Object(request.variables.clone()),
    ])
    .to_string()
}

/// [`Transport`] decorator that serves repeated requests from a cache.
///
/// Only successful payloads are stored.
pub struct CachingTransport<T, C = MemoryCache> {
    inner: T,
    cache: C,
}

impl<T, C> CachingTransport<T, C> {
    /// Wrap `inner` with `cache`.
    pub const fn new(inner: T, cache: C) -> Self {
        Self { inner, cache }
    }

    /// The underlying cache.
    pub const fn cache(&self) -> &C {
        &self.cache
    }
}

impl<T, C> std::fmt::Debug for CachingTransport<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingTransport").finish_non_exhaustive()
    }
}

#[async_trait]
impl<T, C> Transport for CachingTransport<T, C>
where
    T: Transport,
    C: ResponseCache,
{
    async fn execute(&self, request: &GraphqlRequest) -> Result<Value, TransportError> {
        let key = cache_key(request);
        if let Some(data) = self.cache.get(&key)? {
            debug!(operation = %request.operation_name, "response cache hit");
            return Ok(data);
        }
        let data = self.inner.execute(request).await?;
        self.cache.put(&key, &data)?;
        Ok(data)
    }
}
