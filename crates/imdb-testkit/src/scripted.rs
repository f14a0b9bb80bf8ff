//! In-memory transport that replays scripted responses.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use imdb_graphql::{GraphqlRequest, Transport, TransportError};
use parking_lot::Mutex;
use serde_json::Value;

type Scripted = Result<Value, TransportError>;

#[derive(Debug, Default)]
struct Script {
    by_operation: HashMap<String, VecDeque<Scripted>>,
    fallback: VecDeque<Scripted>,
}

/// A [`Transport`] that returns queued `data` payloads and records requests.
///
/// Responses queued for an operation name are used first; otherwise the
/// shared queue is consumed in order. Running out of responses is reported as
/// a protocol error so tests fail loudly instead of hanging.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<Script>,
    requests: Mutex<Vec<GraphqlRequest>>,
}

impl ScriptedTransport {
    /// Create an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `data` payload for the next request.
    #[must_use]
    pub fn with_data(self, data: Value) -> Self {
        self.push(Ok(data));
        self
    }

    /// Queue a failure for the next request.
    #[must_use]
    pub fn with_error(self, error: TransportError) -> Self {
        self.push(Err(error));
        self
    }

    /// Queue a `data` payload for the next request named `operation_name`.
    #[must_use]
    pub fn with_operation(self, operation_name: &str, data: Value) -> Self {
        self.script
            .lock()
            .by_operation
            .entry(operation_name.to_string())
            .or_default()
            .push_back(Ok(data));
        self
    }

    /// Queue a response on the shared queue.
    pub fn push(&self, response: Result<Value, TransportError>) {
        self.script.lock().fallback.push_back(response);
    }

    /// Requests executed so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<GraphqlRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests executed so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Number of queued responses not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        let script = self.script.lock();
        script.fallback.len() + script.by_operation.values().map(VecDeque::len).sum::<usize>()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<Value, TransportError> {
        self.requests.lock().push(request.clone());
        let mut guard = self.script.lock();
        let script = &mut *guard;
        let next = match script
            .by_operation
            .get_mut(&request.operation_name)
            .and_then(VecDeque::pop_front)
        {
            Some(response) => Some(response),
            None => script.fallback.pop_front(),
        };
        next.unwrap_or_else(|| {
            Err(TransportError::Protocol {
                message: format!(
                    "no scripted response for operation {}",
                    request.operation_name
                ),
            })
        })
    }
}
