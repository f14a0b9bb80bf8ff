//! Canonical-id redirect checks.

use tracing::{info, instrument};

use crate::error::{QueryError, QueryResult};
use crate::id::EntityId;
use crate::navigate::Nav;
use crate::operation::GraphqlRequest;
use crate::query::build_entity_query;
use crate::transport::Transport;

const OPERATION: &str = "Redirect";

/// Ask the service for the canonical id of `id`.
///
/// Returns `Some(new_id)` when the entity has been merged into another one,
/// `None` when `id` is already canonical. Never retried or cached here.
#[instrument(skip_all, fields(id = %id))]
pub async fn resolve_canonical_id(
    transport: &dyn Transport,
    id: &EntityId,
) -> QueryResult<Option<EntityId>> {
    let query = build_entity_query(OPERATION, id.kind(), "meta {\n  canonicalId\n}");
    let request = GraphqlRequest::new(query, OPERATION).with_id(id);
    let data = transport.execute(&request).await?;

    let root = id.kind().root_field();
    let canonical = Nav::new(&data)
        .path(&[root, "meta", "canonicalId"])
        .entity_id(id.kind())
        .ok_or_else(|| QueryError::schema(OPERATION, format!("{root}.meta.canonicalId")))?;

    if canonical == *id {
        Ok(None)
    } else {
        info!(canonical = %canonical, "entity id redirects");
        Ok(Some(canonical))
    }
}
