//! IMDb connector configuration.

use std::path::Path;
use std::time::Duration;

use imdb_graphql::{
    DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, EngineConfig, HttpTransport, HttpTransportBuilder,
    ProxySettings, RetryPolicy, SearchSettings, SortBy, SortOrder, ThumbnailSize,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ImdbError, ImdbResult};

/// Configuration for the IMDb connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImdbConfig {
    /// Preferred language for localized data, e.g. `de-DE` (empty: service default)
    #[serde(default)]
    pub language: String,

    /// GraphQL endpoint (default: https://api.graphql.imdb.com/)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Client address sent as `X-Forwarded-For` (empty: not sent)
    #[serde(default)]
    pub ip_address: String,

    /// User agent used unless `force_agent` is set
    #[serde(default = "default_agent")]
    pub default_agent: String,

    /// User agent that overrides `default_agent` when non-empty
    #[serde(default)]
    pub force_agent: String,

    /// Optional HTTP proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,

    /// Request timeout
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Person photo thumbnail size
    #[serde(default = "default_thumbnail")]
    pub photo_thumbnail: ThumbnailSize,

    /// Title thumbnail size in awards, known-for and credit records
    #[serde(default = "default_thumbnail")]
    pub title_thumbnail: ThumbnailSize,

    /// Advanced search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Keep successful responses in memory for the lifetime of the client
    #[serde(default = "default_cache")]
    pub cache: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

fn default_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

const fn default_thumbnail() -> ThumbnailSize {
    ThumbnailSize::new(140, 207)
}

const fn default_cache() -> bool {
    true
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// HTTP proxy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy host
    pub host: String,

    /// Proxy port
    pub port: u16,

    /// Basic-auth user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Basic-auth password
    #[serde(default)]
    pub password: String,
}

impl From<&ProxyConfig> for ProxySettings {
    fn from(proxy: &ProxyConfig) -> Self {
        Self {
            host: proxy.host.clone(),
            port: proxy.port,
            user: proxy.user.clone(),
            password: proxy.password.clone(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay between retries in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay between retries in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Maximum random jitter added to each delay in milliseconds
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_initial_delay_ms() -> u64 {
    200
}

const fn default_max_delay_ms() -> u64 {
    5_000
}

const fn default_jitter_ms() -> u64 {
    150
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter_ms: default_jitter_ms(),
        }
    }
}

impl RetryConfig {
    /// Transport retry policy for these settings.
    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: usize::try_from(self.max_attempts.max(1)).unwrap_or(usize::MAX),
            base_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            max_jitter: Duration::from_millis(self.jitter_ms),
        }
    }
}

/// Advanced search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of results
    #[serde(default = "default_amount")]
    pub amount: u32,

    /// Sort key, e.g. `POPULARITY` or `USER_RATING`
    #[serde(default)]
    pub sort_by: SortBy,

    /// `ASC` or `DESC`
    #[serde(default)]
    pub sort_order: SortOrder,
}

const fn default_amount() -> u32 {
    500
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            amount: default_amount(),
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl Default for ImdbConfig {
    fn default() -> Self {
        Self {
            language: String::new(),
            endpoint: default_endpoint(),
            ip_address: String::new(),
            default_agent: default_agent(),
            force_agent: String::new(),
            proxy: None,
            timeout: default_timeout(),
            retry: RetryConfig::default(),
            photo_thumbnail: default_thumbnail(),
            title_thumbnail: default_thumbnail(),
            search: SearchConfig::default(),
            cache: default_cache(),
        }
    }
}

impl ImdbConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> ImdbResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> ImdbResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> ImdbResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(ImdbError::Config("endpoint must not be empty".into()));
        }
        for (what, size) in [
            ("photo_thumbnail", self.photo_thumbnail),
            ("title_thumbnail", self.title_thumbnail),
        ] {
            if size.width == 0 || size.height == 0 {
                return Err(ImdbError::Config(format!(
                    "{what} must have a non-zero width and height"
                )));
            }
        }
        if let Some(proxy) = &self.proxy {
            if proxy.host.trim().is_empty() {
                return Err(ImdbError::Config("proxy host must not be empty".into()));
            }
        }
        Ok(())
    }

    /// User agent actually sent: the forced agent when set, otherwise the default.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        if self.force_agent.trim().is_empty() {
            &self.default_agent
        } else {
            &self.force_agent
        }
    }

    /// Engine settings derived from this config.
    #[must_use]
    pub const fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            photo_thumbnail: self.photo_thumbnail,
            title_thumbnail: self.title_thumbnail,
            search: SearchSettings {
                amount: self.search.amount,
                sort_by: self.search.sort_by,
                sort_order: self.search.sort_order,
                thumbnail_height: self.title_thumbnail.height,
            },
        }
    }

    /// Build the HTTP transport described by this config.
    pub fn http_transport(&self) -> ImdbResult<HttpTransport> {
        let mut builder = HttpTransportBuilder::new(self.endpoint.clone())
            .with_timeout(self.timeout)
            .with_retry_policy(self.retry.policy())
            .with_user_agent(self.user_agent())?;
        if !self.language.trim().is_empty() {
            builder = builder.with_language(self.language.trim())?;
        }
        if !self.ip_address.trim().is_empty() {
            builder = builder.with_forwarded_for(self.ip_address.trim())?;
        }
        if let Some(proxy) = &self.proxy {
            builder = builder.with_proxy(proxy.into());
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = ImdbConfig::from_toml_str("").unwrap();
        assert_eq!(config, ImdbConfig::default());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.search.amount, 500);
        assert!(config.cache);
    }

    #[test]
    fn forced_agent_wins() {
        let mut config = ImdbConfig::default();
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
        config.force_agent = "test-agent/1.0".into();
        assert_eq!(config.user_agent(), "test-agent/1.0");
    }

    #[test]
    fn zero_sized_thumbnails_are_rejected() {
        let err = ImdbConfig::from_toml_str("photo_thumbnail = { width = 0, height = 207 }")
            .unwrap_err();
        assert!(matches!(err, ImdbError::Config(message) if message.contains("photo_thumbnail")));
    }

    #[test]
    fn retry_policy_never_drops_below_one_attempt() {
        let retry = RetryConfig {
            max_attempts: 0,
            ..RetryConfig::default()
        };
        assert_eq!(retry.policy().max_attempts, 1);
        assert_eq!(retry.policy().max_jitter, Duration::from_millis(150));
    }

    #[test]
    fn engine_config_follows_thumbnails_and_search() {
        let config = ImdbConfig::from_toml_str(
            r#"
title_thumbnail = { width = 100, height = 150 }

[search]
amount = 25
sort_by = "USER_RATING"
sort_order = "DESC"
"#,
        )
        .unwrap();
        let engine = config.engine_config();
        assert_eq!(engine.title_thumbnail, ThumbnailSize::new(100, 150));
        assert_eq!(engine.search.thumbnail_height, 150);
        assert_eq!(engine.search.amount, 25);
        assert_eq!(engine.search.sort_by, SortBy::UserRating);
        assert_eq!(engine.search.sort_order, SortOrder::Desc);
    }
}
