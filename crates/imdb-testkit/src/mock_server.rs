//! Mock GraphQL endpoint for testing the HTTP transport.
//!
//! Wraps wiremock with helpers for the single-endpoint POST protocol.

use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Respond, ResponseTemplate};

const GRAPHQL_PATH: &str = "/";

/// A mock GraphQL server.
pub struct MockGraphqlServer {
    server: MockServer,
}

impl MockGraphqlServer {
    /// Start a new mock server.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Endpoint URL to point a transport at.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{GRAPHQL_PATH}", self.server.uri())
    }

    /// Underlying wiremock server for advanced configuration.
    #[must_use]
    pub const fn inner(&self) -> &MockServer {
        &self.server
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Response Setup
    // ─────────────────────────────────────────────────────────────────────────────

    /// Answer every request with `{"data": data}`.
    pub async fn respond_data(&self, data: Value) {
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(json_response(200, json!({ "data": data })))
            .mount(&self.server)
            .await;
    }

    /// Answer requests for `operation_name` with `{"data": data}`.
    pub async fn respond_operation(&self, operation_name: &str, data: Value) {
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({ "operationName": operation_name })))
            .respond_with(json_response(200, json!({ "data": data })))
            .mount(&self.server)
            .await;
    }

    /// Answer every request with a GraphQL `errors` array.
    pub async fn respond_errors(&self, messages: &[&str]) {
        let errors: Vec<Value> = messages
            .iter()
            .map(|message| json!({ "message": message }))
            .collect();
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(json_response(200, json!({ "data": null, "errors": errors })))
            .mount(&self.server)
            .await;
    }

    /// Answer every request with an HTTP error status.
    pub async fn respond_status(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(json_response(status, body))
            .mount(&self.server)
            .await;
    }

    /// Answer requests with `responses` in order, repeating the last one.
    pub async fn respond_sequence(&self, responses: Vec<(u16, Value)>) {
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(SequenceResponder::new(responses))
            .mount(&self.server)
            .await;
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────────

    /// All received requests.
    pub async fn received_requests(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// JSON bodies of all received requests.
    pub async fn received_bodies(&self) -> Vec<Value> {
        self.received_requests()
            .await
            .iter()
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }

    /// Verify that a specific number of requests were received.
    ///
    /// # Panics
    ///
    /// Panics if the count doesn't match.
    pub async fn assert_request_count(&self, expected: usize) {
        let received = self.received_requests().await;
        assert_eq!(
            received.len(),
            expected,
            "Expected {expected} requests but received {}",
            received.len()
        );
    }
}

fn json_response(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .set_body_json(body)
        .insert_header("content-type", "application/json")
}

struct SequenceResponder {
    responses: Vec<(u16, Value)>,
    index: std::sync::atomic::AtomicUsize,
}

impl SequenceResponder {
    fn new(responses: Vec<(u16, Value)>) -> Self {
        Self {
            responses,
            index: std::sync::atomic::AtomicUsize::new(0),
        }
    }
}

impl Respond for SequenceResponder {
    fn respond(&self, _request: &wiremock::Request) -> ResponseTemplate {
        let idx = self
            .index
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let last = self.responses.len().saturating_sub(1);
        self.responses
            .get(idx.min(last))
            .map_or_else(
                || ResponseTemplate::new(500),
                |(status, body)| json_response(*status, body.clone()),
            )
    }
}
