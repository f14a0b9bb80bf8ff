use std::sync::Arc;

use serde_json::{Value, json};

use imdb_graphql::{
    Connection, EngineConfig, EntityId, FilterClause, GraphEngine, ImageSizer, MemoryCache,
    QueryError, RelationshipType, SearchInput, ThumbnailSize, TransportError, ValidationError,
};
use reqwest::StatusCode;
use imdb_testkit::{ScriptedTransport, fixtures, init_test_tracing};

struct FixedSizer;

impl ImageSizer for FixedSizer {
    fn resize_parameter(&self, width: u32, height: u32, target: ThumbnailSize) -> String {
        format!("W{width}H{height}T{}x{}_.jpg", target.width, target.height)
    }
}

fn engine(transport: &Arc<ScriptedTransport>) -> GraphEngine {
    GraphEngine::new(
        Arc::clone(transport) as Arc<dyn imdb_graphql::Transport>,
        Arc::new(FixedSizer),
        EngineConfig::default(),
    )
}

fn person() -> EntityId {
    EntityId::name("0000206").expect("valid id")
}

fn trivia() -> Connection {
    Connection::new("Data", "trivia", "text {\nplainText\n}")
}

#[tokio::test]
async fn fetches_every_page_in_order() {
    init_test_tracing();
    let nodes: Vec<Value> = (0..7).map(|i| json!({ "i": i })).collect();
    let transport = Arc::new(ScriptedTransport::new());
    for page in fixtures::name_pages("trivia", nodes.clone(), 3) {
        transport.push(Ok(page));
    }

    let fetched = engine(&transport)
        .fetch_all(&person(), &trivia())
        .await
        .expect("all pages");

    assert_eq!(fetched, nodes);
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn echoes_cursors_verbatim() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .with_data(fixtures::connection_page(
                "name",
                "trivia",
                vec![json!({"i": 0})],
                Some("YXJyYXljb25uZWN0aW9uOjA= +/"),
                true,
            ))
            .with_data(fixtures::last_name_page("trivia", vec![json!({"i": 1})])),
    );

    engine(&transport)
        .fetch_all(&person(), &trivia())
        .await
        .expect("two pages");

    let requests = transport.requests();
    assert_eq!(requests[0].variables["after"], Value::Null);
    assert_eq!(requests[0].variables["id"], "nm0000206");
    assert_eq!(requests[1].variables["after"], "YXJyYXljb25uZWN0aW9uOjA= +/");
    assert_eq!(requests[0].query, requests[1].query);
}

#[tokio::test]
async fn empty_connection_takes_one_request() {
    let transport =
        Arc::new(ScriptedTransport::new().with_data(fixtures::last_name_page("relations", vec![])));
    let relations = Connection::new("Data", "relations", "relationName { nameText }")
        .with_filter(FilterClause::RelationshipType(RelationshipType::Children));

    let fetched = engine(&transport)
        .fetch_all(&person(), &relations)
        .await
        .expect("empty page");

    assert!(fetched.is_empty());
    assert_eq!(transport.request_count(), 1);
    assert!(
        transport.requests()[0]
            .query
            .contains("relations(first: 9999, after: $after, filter: {relationshipTypes: CHILDREN}) {")
    );
}

#[tokio::test]
async fn a_failed_page_discards_earlier_pages() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .with_data(fixtures::connection_page(
                "name",
                "trivia",
                vec![json!({"i": 0})],
                Some("c1"),
                true,
            ))
            .with_data(json!({"name": {"trivia": null}})),
    );

    let err = engine(&transport)
        .fetch_all(&person(), &trivia())
        .await
        .expect_err("second page is malformed");

    assert!(matches!(
        err,
        QueryError::SchemaMismatch { ref path, .. } if path == "name.trivia"
    ));
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn a_transport_failure_mid_walk_is_returned_unchanged() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .with_data(fixtures::connection_page(
                "name",
                "trivia",
                vec![json!({"i": 0})],
                Some("c1"),
                true,
            ))
            .with_error(TransportError::HttpStatus {
                status: StatusCode::BAD_GATEWAY,
                body: "upstream down".to_string(),
                retry_after: None,
            }),
    );

    let err = engine(&transport)
        .fetch_all(&person(), &trivia())
        .await
        .expect_err("second page fails");

    assert!(matches!(
        err,
        QueryError::Transport(TransportError::HttpStatus { status, ref body, .. })
            if status == StatusCode::BAD_GATEWAY && body == "upstream down"
    ));
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn a_list_of_empty_elements_is_still_a_constraint() {
    let transport =
        Arc::new(ScriptedTransport::new().with_data(json!({"advancedTitleSearch": {"edges": []}})));

    let results = engine(&transport)
        .advanced_search(&SearchInput {
            genres: ",".to_string(),
            ..SearchInput::default()
        })
        .await
        .expect("search");

    assert!(results.is_empty());
    assert_eq!(transport.request_count(), 1);
    assert!(transport.requests()[0].query.contains(r#"allGenreIds: ["",""]"#));
}

#[tokio::test]
async fn blank_search_issues_no_request() {
    let transport = Arc::new(ScriptedTransport::new());
    let results = engine(&transport)
        .advanced_search(&SearchInput {
            term: "   ".to_string(),
            genres: " ".to_string(),
            ..SearchInput::default()
        })
        .await
        .expect("empty search");

    assert!(results.is_empty());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn impossible_dates_reject_the_search() {
    let transport = Arc::new(ScriptedTransport::new());
    let err = engine(&transport)
        .advanced_search(&SearchInput {
            term: "matrix".to_string(),
            start_date: "2021-02-30".to_string(),
            ..SearchInput::default()
        })
        .await
        .expect_err("invalid date");

    assert!(matches!(
        err,
        QueryError::Validation(ValidationError::InvalidDate { field: "start_date", .. })
    ));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn search_normalizes_each_hit() {
    let transport = Arc::new(ScriptedTransport::new().with_data(json!({
        "advancedTitleSearch": {"edges": [
            {"node": {"title": {
                "id": "tt0133093",
                "originalTitleText": {"text": "The Matrix"},
                "titleText": {"text": "Matrix"},
                "titleType": {"text": "Movie"},
                "releaseYear": {"year": 1999, "endYear": null},
                "meterRanking": {"currentRank": 112},
                "ratingsSummary": {"aggregateRating": 8.7},
                "plot": {"plotText": {"plainText": "A hacker learns the truth."}},
                "primaryImage": {"url": "https://m.media-amazon.com/images/M/abc._V1_.jpg"}
            }}},
            {"node": null}
        ]}
    })));

    let results = engine(&transport)
        .advanced_search(&SearchInput {
            genres: "Action, Sci-Fi".to_string(),
            ..SearchInput::default()
        })
        .await
        .expect("search");

    assert_eq!(results.len(), 2);
    let hit = serde_json::to_value(&results[0]).expect("serialize");
    assert_eq!(
        hit,
        json!({
            "id": "0133093",
            "originalTitle": "The Matrix",
            "title": "Matrix",
            "titleType": "Movie",
            "year": "1999",
            "rank": 112,
            "rating": 8.7,
            "plot": "A hacker learns the truth.",
            "thumbUrl": "https://m.media-amazon.com/images/M/abc._V1_QL75_SY207_.jpg"
        })
    );
    assert!(results[1].id.is_none());

    let request = &transport.requests()[0];
    assert_eq!(request.operation_name, "AdvancedSearch");
    assert!(request.query.contains("allGenreIds: [\"Action\",\"Sci-Fi\"]"));
    assert!(request.variables.is_empty());
}

#[tokio::test]
async fn redirect_detection() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .with_data(json!({"name": {"meta": {"canonicalId": "nm0000206"}}}))
            .with_data(json!({"name": {"meta": {"canonicalId": "nm0000999"}}}))
            .with_data(json!({"name": {"meta": {}}})),
    );
    let engine = engine(&transport);

    assert_eq!(engine.canonical_id(&person()).await.expect("same"), None);
    assert_eq!(
        engine.canonical_id(&person()).await.expect("moved"),
        Some(EntityId::name("0000999").expect("valid id"))
    );
    assert!(matches!(
        engine.canonical_id(&person()).await,
        Err(QueryError::SchemaMismatch { .. })
    ));
    assert_eq!(transport.requests()[0].operation_name, "Redirect");
}

#[tokio::test]
async fn cached_engine_reuses_responses_but_not_redirects() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .with_operation("Name", json!({"name": {"nameText": {"text": "Julia Roberts"}}}))
            .with_operation("Redirect", json!({"name": {"meta": {"canonicalId": "nm0000210"}}}))
            .with_operation("Redirect", json!({"name": {"meta": {"canonicalId": "nm0000210"}}})),
    );
    let engine = GraphEngine::with_cache(
        Arc::clone(&transport) as Arc<dyn imdb_graphql::Transport>,
        MemoryCache::new(),
        Arc::new(FixedSizer),
        EngineConfig::default(),
    );
    let id = EntityId::name("nm0000210").expect("valid id");

    for _ in 0..2 {
        let data = engine
            .query("Name", &id, "nameText {\ntext\n}")
            .await
            .expect("name");
        assert_eq!(data["name"]["nameText"]["text"], "Julia Roberts");
    }
    engine.canonical_id(&id).await.expect("redirect");
    engine.canonical_id(&id).await.expect("redirect");

    let operations: Vec<String> = transport
        .requests()
        .into_iter()
        .map(|request| request.operation_name)
        .collect();
    assert_eq!(operations, vec!["Name", "Redirect", "Redirect"]);
}

#[tokio::test]
async fn engine_images_use_the_configured_sizer() {
    let transport = Arc::new(ScriptedTransport::new());
    let node = fixtures::image("https://img.example/p/abc._V1_.jpg", 1000, 1500);
    let image = engine(&transport).image(
        imdb_graphql::Nav::new(&node),
        ThumbnailSize::new(140, 207),
    );

    assert_eq!(
        image.full_url.as_deref(),
        Some("https://img.example/p/abc._V1_QL100_UX1000_.jpg")
    );
    assert_eq!(
        image.thumb_url.as_deref(),
        Some("https://img.example/p/abc._V1_W1000H1500T140x207_.jpg")
    );
}
