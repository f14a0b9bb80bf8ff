use std::io::Write;
use std::time::Duration;

use imdb_connector::{ImdbClient, ImdbConfig, ImdbError};
use imdb_graphql::{SortBy, ThumbnailSize};
use imdb_testkit::MockGraphqlServer;
use serde_json::json;

#[test]
fn loads_a_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
language = "de-DE"
ip_address = "203.0.113.7"
force_agent = "imdb-test/1.0"
timeout = 5
cache = false
photo_thumbnail = {{ width = 100, height = 150 }}

[proxy]
host = "proxy.local"
port = 3128
user = "scott"
password = "tiger"

[retry]
max_attempts = 5

[search]
amount = 50
sort_by = "RELEASE_DATE"
"#
    )
    .unwrap();

    let config = ImdbConfig::load(file.path()).unwrap();
    assert_eq!(config.language, "de-DE");
    assert_eq!(config.user_agent(), "imdb-test/1.0");
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert!(!config.cache);
    assert_eq!(config.photo_thumbnail, ThumbnailSize::new(100, 150));
    assert_eq!(config.title_thumbnail, ThumbnailSize::new(140, 207));
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.initial_delay_ms, 200);
    assert_eq!(config.search.sort_by, SortBy::ReleaseDate);

    let proxy = config.proxy.as_ref().unwrap();
    assert_eq!(proxy.host, "proxy.local");
    assert_eq!(proxy.user.as_deref(), Some("scott"));
}

#[test]
fn missing_files_and_bad_toml_are_reported() {
    let err = ImdbConfig::load("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ImdbError::Io(_)));

    let err = ImdbConfig::from_toml_str("timeout = \"soon\"").unwrap_err();
    assert!(matches!(err, ImdbError::Toml(_)));

    let err = ImdbConfig::from_toml_str("[proxy]\nhost = \" \"\nport = 80").unwrap_err();
    assert!(matches!(err, ImdbError::Config(_)));
}

#[tokio::test]
async fn configured_headers_reach_the_service() {
    let mock = MockGraphqlServer::start().await;
    mock.respond_operation("Name", json!({"name": {"nameText": {"text": "Tom Hanks"}}}))
        .await;

    let config = ImdbConfig::from_toml_str(&format!(
        r#"
endpoint = "{}"
language = "en-US"
ip_address = "198.51.100.4"
force_agent = "imdb-test/2.0"
"#,
        mock.endpoint()
    ))
    .unwrap();
    let client = ImdbClient::new(&config).unwrap();
    let person = client.person("0000158").unwrap();

    assert_eq!(person.name().await.unwrap(), Some("Tom Hanks"));

    let requests = mock.received_requests().await;
    assert_eq!(requests.len(), 1);
    let headers = &requests[0].headers;
    assert_eq!(headers.get("accept-language").unwrap(), "en-US");
    assert_eq!(headers.get("x-forwarded-for").unwrap(), "198.51.100.4");
    assert_eq!(headers.get("user-agent").unwrap(), "imdb-test/2.0");
}
