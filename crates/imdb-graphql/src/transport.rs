//! Transport interface consumed by the engine.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::operation::GraphqlRequest;

/// Executes one GraphQL request against the remote service.
///
/// Implementations return the `data` member of the response. Network and
/// protocol failures, and responses carrying GraphQL `errors`, are reported as
/// [`TransportError`]. Timeouts, retries and cancellation are the
/// implementation's concern.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `request` and return the response `data`.
    async fn execute(&self, request: &GraphqlRequest) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: &GraphqlRequest) -> Result<Value, TransportError> {
        (**self).execute(request).await
    }
}

