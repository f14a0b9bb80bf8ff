//! IMDb GraphQL - paginated query-and-normalize engine.
//!
//! This crate provides:
//! - Query text builders with typed filter clauses.
//! - A transport interface and a reqwest transport with retry and backoff.
//! - Cursor pagination that collects complete connections.
//! - Null-safe navigation and shared normalizers (dates, images).
//! - Validated advanced title search and canonical-id redirect checks.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::too_many_lines)]

mod cache;
mod client;
mod config;
mod engine;
mod error;
mod id;
mod memo;
mod navigate;
mod normalize;
mod operation;
mod pagination;
mod query;
mod redirect;
mod retry;
mod search;
mod transport;

pub use cache::{CachingTransport, MemoryCache, ResponseCache, cache_key};
pub use client::{
    DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, HttpTransport, HttpTransportBuilder,
    HttpTransportConfig, HttpTransportMetrics, HttpTransportMetricsSnapshot, ProxySettings,
};
pub use config::EngineConfig;
pub use engine::GraphEngine;
pub use error::{
    GraphqlError, GraphqlErrorLocation, GraphqlPathSegment, HttpErrorInfo, QueryError,
    QueryResult, TransportError, ValidationError,
};
pub use id::{EntityId, EntityKind, IdError};
pub use memo::Memo;
pub use navigate::Nav;
pub use normalize::{
    DateComponents, FULL_IMAGE_SUFFIX, ImageSizer, ImageVariant, ThumbnailSize, month_name,
    normalize_date, normalize_image, normalize_image_node, strip_extension,
};
pub use operation::{GraphqlRequest, GraphqlResponse, Variables};
pub use pagination::{Connection, CursorPage, CursorPageInfo, fetch_all, paginate_cursor};
pub use query::{
    FilterClause, MAX_PAGE_SIZE, RelationshipType, SortOrder, build_entity_query,
    build_paged_query, compact_lines,
};
pub use redirect::resolve_canonical_id;
pub use retry::{RetryDecision, RetryPolicy};
pub use search::{
    SearchConstraints, SearchInput, SearchSettings, SortBy, TitleSummary, advanced_search,
    render_credit_ids, render_date_range, render_list, render_term,
};
pub use transport::Transport;
