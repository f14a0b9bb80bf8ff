//! Engine facade shared by entity accessors.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;

use crate::cache::{CachingTransport, ResponseCache};
use crate::config::EngineConfig;
use crate::error::QueryResult;
use crate::id::EntityId;
use crate::navigate::Nav;
use crate::normalize::{ImageSizer, ImageVariant, ThumbnailSize, normalize_image_node};
use crate::operation::GraphqlRequest;
use crate::pagination::{Connection, fetch_all};
use crate::query::build_entity_query;
use crate::redirect::resolve_canonical_id;
use crate::search::{SearchInput, TitleSummary, advanced_search};
use crate::transport::Transport;

/// Transport, image sizer and configuration bundled for accessors.
///
/// Cheap to clone; clones share the transport and any cache.
#[derive(Clone)]
pub struct GraphEngine {
    transport: Arc<dyn Transport>,
    direct: Arc<dyn Transport>,
    sizer: Arc<dyn ImageSizer>,
    config: EngineConfig,
}

impl fmt::Debug for GraphEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GraphEngine {
    /// Create an engine without response caching.
    pub fn new(
        transport: Arc<dyn Transport>,
        sizer: Arc<dyn ImageSizer>,
        config: EngineConfig,
    ) -> Self {
        Self {
            direct: Arc::clone(&transport),
            transport,
            sizer,
            config,
        }
    }

    /// Create an engine whose queries go through `cache`.
    ///
    /// Redirect checks always bypass the cache.
    pub fn with_cache<C>(
        transport: Arc<dyn Transport>,
        cache: C,
        sizer: Arc<dyn ImageSizer>,
        config: EngineConfig,
    ) -> Self
    where
        C: ResponseCache + 'static,
    {
        Self {
            transport: Arc::new(CachingTransport::new(Arc::clone(&transport), cache)),
            direct: transport,
            sizer,
            config,
        }
    }

    /// Engine configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a single-entity query selecting `selection` and return `data`.
    #[instrument(skip(self, selection), fields(id = %id))]
    pub async fn query(
        &self,
        operation_name: &str,
        id: &EntityId,
        selection: &str,
    ) -> QueryResult<Value> {
        let query = build_entity_query(operation_name, id.kind(), selection);
        let request = GraphqlRequest::new(query, operation_name).with_id(id);
        Ok(self.transport.execute(&request).await?)
    }

    /// Fetch every node of a connection.
    pub async fn fetch_all(
        &self,
        id: &EntityId,
        connection: &Connection,
    ) -> QueryResult<Vec<Value>> {
        fetch_all(self.transport.as_ref(), id, connection).await
    }

    /// Canonical id of `id` if it redirects elsewhere.
    pub async fn canonical_id(&self, id: &EntityId) -> QueryResult<Option<EntityId>> {
        resolve_canonical_id(self.direct.as_ref(), id).await
    }

    /// Advanced title search with the configured settings.
    pub async fn advanced_search(&self, input: &SearchInput) -> QueryResult<Vec<TitleSummary>> {
        advanced_search(self.transport.as_ref(), input, &self.config.search).await
    }

    /// Image variants of a `{url, width, height}` node.
    pub fn image(&self, image: Nav<'_>, target: ThumbnailSize) -> ImageVariant {
        normalize_image_node(image, target, self.sizer.as_ref())
    }
}
