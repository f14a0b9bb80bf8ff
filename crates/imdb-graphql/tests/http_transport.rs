use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, Request, Respond, ResponseTemplate};

use imdb_graphql::{
    EntityId, GraphqlRequest, HttpTransportBuilder, RetryPolicy, Transport, TransportError,
};
use imdb_testkit::{MockGraphqlServer, init_test_tracing};

struct CountingResponder {
    counter: Arc<AtomicUsize>,
    status: u16,
}

impl Respond for CountingResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.counter.fetch_add(1, Ordering::SeqCst);
        ResponseTemplate::new(self.status).set_body_json(json!({"error": "fail"}))
    }
}

fn fast_retry(max_attempts: usize) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(20),
        max_jitter: Duration::ZERO,
    }
}

fn name_request() -> GraphqlRequest {
    GraphqlRequest::new("query Name($id: ID!) {\nname(id: $id) {\nid\n}\n}", "Name")
        .with_id(&EntityId::name("0000206").expect("valid id"))
}

#[tokio::test]
async fn posts_request_body_and_returns_data() {
    init_test_tracing();
    let mock = MockGraphqlServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "query": "query Name($id: ID!) {\nname(id: $id) {\nid\n}\n}",
            "operationName": "Name",
            "variables": {"id": "nm0000206"}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"name": {"id": "nm0000206"}}})),
        )
        .mount(mock.inner())
        .await;

    let transport = HttpTransportBuilder::new(mock.endpoint())
        .build()
        .expect("transport");
    let data = transport
        .execute(&name_request())
        .await
        .expect("request should succeed");

    assert_eq!(data, json!({"name": {"id": "nm0000206"}}));
    assert_eq!(transport.metrics().requests_success, 1);
}

#[tokio::test]
async fn sends_locale_forwarding_and_agent_headers() {
    let mock = MockGraphqlServer::start().await;

    Mock::given(method("POST"))
        .and(header("accept-language", "de-DE"))
        .and(header("x-forwarded-for", "203.0.113.7"))
        .and(header("user-agent", "imdb-tests/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(mock.inner())
        .await;

    let transport = HttpTransportBuilder::new(mock.endpoint())
        .with_language("de-DE")
        .and_then(|b| b.with_forwarded_for("203.0.113.7"))
        .and_then(|b| b.with_user_agent("imdb-tests/1.0"))
        .expect("headers")
        .build()
        .expect("transport");

    let data = transport.execute(&name_request()).await.expect("headers matched");
    assert_eq!(data, json!({}));
}

#[tokio::test]
async fn graphql_errors_are_transport_failures() {
    let mock = MockGraphqlServer::start().await;
    mock.respond_errors(&["Cannot query field \"foo\" on type \"Name\"."])
        .await;

    let transport = HttpTransportBuilder::new(mock.endpoint())
        .build()
        .expect("transport");
    let err = transport
        .execute(&name_request())
        .await
        .expect_err("errors array must fail");

    match err {
        TransportError::GraphqlErrors { errors } => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].message.contains("Cannot query field"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_data_is_a_protocol_error() {
    let mock = MockGraphqlServer::start().await;
    mock.respond_status(200, json!({"extensions": {}})).await;

    let transport = HttpTransportBuilder::new(mock.endpoint())
        .build()
        .expect("transport");
    let err = transport.execute(&name_request()).await.unwrap_err();
    assert!(matches!(err, TransportError::Protocol { .. }));
}

#[tokio::test]
async fn retries_server_errors_then_succeeds() {
    init_test_tracing();
    let mock = MockGraphqlServer::start().await;
    mock.respond_sequence(vec![
        (500, json!({"error": "fail"})),
        (200, json!({"data": {"name": {"id": "nm0000206"}}})),
    ])
    .await;

    let transport = HttpTransportBuilder::new(mock.endpoint())
        .with_retry_policy(fast_retry(3))
        .build()
        .expect("transport");
    let data = transport.execute(&name_request()).await.expect("retry succeeds");

    assert_eq!(data["name"]["id"], "nm0000206");
    mock.assert_request_count(2).await;
    let metrics = transport.metrics();
    assert_eq!(metrics.requests_total, 2);
    assert_eq!(metrics.requests_retried, 1);
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let mock = MockGraphqlServer::start().await;
    let counter = Arc::new(AtomicUsize::new(0));
    Mock::given(method("POST"))
        .respond_with(CountingResponder {
            counter: Arc::clone(&counter),
            status: 503,
        })
        .mount(mock.inner())
        .await;

    let transport = HttpTransportBuilder::new(mock.endpoint())
        .with_retry_policy(fast_retry(3))
        .build()
        .expect("transport");
    let err = transport.execute(&name_request()).await.unwrap_err();

    assert!(matches!(err, TransportError::HttpStatus { status, .. } if status.as_u16() == 503));
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let mock = MockGraphqlServer::start().await;
    let counter = Arc::new(AtomicUsize::new(0));
    Mock::given(method("POST"))
        .respond_with(CountingResponder {
            counter: Arc::clone(&counter),
            status: 400,
        })
        .mount(mock.inner())
        .await;

    let transport = HttpTransportBuilder::new(mock.endpoint())
        .with_retry_policy(fast_retry(3))
        .build()
        .expect("transport");
    let err = transport.execute(&name_request()).await.unwrap_err();

    assert!(!err.is_retryable());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}
