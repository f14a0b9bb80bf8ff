//! IMDb client facade.

use std::sync::Arc;

use imdb_graphql::{EntityId, GraphEngine, MemoryCache, SearchInput, TitleSummary, Transport};
use tracing::{info, instrument};

use crate::config::ImdbConfig;
use crate::error::ImdbResult;
use crate::image::AspectCropSizer;
use crate::person::Person;

/// Entry point: owns the engine and hands out entities.
#[derive(Debug, Clone)]
pub struct ImdbClient {
    engine: GraphEngine,
}

impl ImdbClient {
    /// Build an HTTP-backed client from `config`.
    pub fn new(config: &ImdbConfig) -> ImdbResult<Self> {
        let transport = Arc::new(config.http_transport()?);
        info!(
            endpoint = %config.endpoint,
            cache = config.cache,
            "IMDb client ready"
        );
        Ok(Self::with_transport(transport, config))
    }

    /// Build a client over any transport.
    pub fn with_transport(transport: Arc<dyn Transport>, config: &ImdbConfig) -> Self {
        let sizer = Arc::new(AspectCropSizer::new());
        let engine = if config.cache {
            GraphEngine::with_cache(transport, MemoryCache::new(), sizer, config.engine_config())
        } else {
            GraphEngine::new(transport, sizer, config.engine_config())
        };
        Self { engine }
    }

    /// Shared engine.
    #[must_use]
    pub const fn engine(&self) -> &GraphEngine {
        &self.engine
    }

    /// A person by id (`"0000123"` or `"nm0000123"`).
    pub fn person(&self, id: &str) -> ImdbResult<Person> {
        Person::parse(id, self.engine.clone())
    }

    /// Advanced title search.
    #[instrument(skip(self))]
    pub async fn search(&self, input: &SearchInput) -> ImdbResult<Vec<TitleSummary>> {
        Ok(self.engine.advanced_search(input).await?)
    }

    /// Canonical id of a person or title id, if it redirects.
    pub async fn redirect(&self, id: &EntityId) -> ImdbResult<Option<EntityId>> {
        Ok(self.engine.canonical_id(id).await?)
    }
}
