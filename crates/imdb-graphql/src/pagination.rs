//! Cursor pagination over connection fields.

use std::future::Future;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{QueryError, QueryResult};
use crate::id::EntityId;
use crate::navigate::Nav;
use crate::operation::GraphqlRequest;
use crate::query::{FilterClause, build_paged_query};
use crate::transport::Transport;

/// Cursor-based page info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPageInfo {
    /// Whether there is another page.
    pub has_next_page: bool,
    /// Cursor for the next page, echoed verbatim.
    pub end_cursor: Option<String>,
}

/// Cursor-based page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPage<T> {
    /// Items in the page.
    pub items: Vec<T>,
    /// Pagination info.
    pub page_info: CursorPageInfo,
}

/// Drive a cursor-based API until `has_next_page` is false.
///
/// Items are appended in page order. The first failing page aborts the walk.
/// A page claiming more results without a cursor ends the walk; callers that
/// treat this as an error should reject such pages inside `fetch_page`.
pub async fn paginate_cursor<T, E, F, Fut>(
    mut cursor: Option<String>,
    mut fetch_page: F,
) -> Result<Vec<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<CursorPage<T>, E>>,
{
    let mut out = Vec::new();
    loop {
        let page = fetch_page(cursor.take()).await?;
        out.extend(page.items);

        if !page.page_info.has_next_page {
            break;
        }
        cursor = page.page_info.end_cursor;
        if cursor.is_none() {
            break;
        }
    }

    Ok(out)
}

/// A connection field of one entity, with its node selection and filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    operation_name: String,
    field_name: String,
    node_fragment: String,
    filters: Vec<FilterClause>,
}

impl Connection {
    /// Describe `field_name { edges { node { node_fragment } } }`.
    #[must_use]
    pub fn new(
        operation_name: impl Into<String>,
        field_name: impl Into<String>,
        node_fragment: impl Into<String>,
    ) -> Self {
        Self {
            operation_name: operation_name.into(),
            field_name: field_name.into(),
            node_fragment: node_fragment.into(),
            filters: Vec::new(),
        }
    }

    /// Append a filter clause.
    #[must_use]
    pub fn with_filter(mut self, filter: FilterClause) -> Self {
        self.filters.push(filter);
        self
    }

    /// Operation name.
    #[must_use]
    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    /// Connection field name.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Filter clauses in render order.
    #[must_use]
    pub fn filters(&self) -> &[FilterClause] {
        &self.filters
    }

    fn query_for(&self, id: &EntityId) -> String {
        build_paged_query(
            &self.operation_name,
            id.kind(),
            &self.field_name,
            &self.node_fragment,
            &self.filters,
        )
    }
}

/// Fetch every node of `connection` for `id`, in server order.
///
/// One request is issued per page. Nodes are neither re-sorted nor
/// de-duplicated; edges without a node are skipped.
#[instrument(skip_all, fields(id = %id, field = %connection.field_name))]
pub async fn fetch_all(
    transport: &dyn Transport,
    id: &EntityId,
    connection: &Connection,
) -> QueryResult<Vec<Value>> {
    let query = connection.query_for(id);
    let mut pages = 0_usize;

    let nodes = paginate_cursor(None, |after: Option<String>| {
        pages += 1;
        let page_number = pages;
        let request = GraphqlRequest::new(query.as_str(), connection.operation_name.as_str())
            .with_id(id)
            .with_variable("after", after.map_or(Value::Null, Value::String));
        async move {
            let data = transport.execute(&request).await?;
            let page = parse_page(&data, id, connection)?;
            debug!(
                page = page_number,
                items = page.items.len(),
                has_next_page = page.page_info.has_next_page,
                "fetched connection page"
            );
            Ok::<_, QueryError>(page)
        }
    })
    .await?;

    debug!(pages, total = nodes.len(), "connection fetch complete");
    Ok(nodes)
}

fn parse_page(
    data: &Value,
    id: &EntityId,
    connection: &Connection,
) -> QueryResult<CursorPage<Value>> {
    let op = connection.operation_name();
    let root = id.kind().root_field();
    let field_path = format!("{root}.{}", connection.field_name);

    let field = Nav::new(data).path(&[root, connection.field_name.as_str()]);
    if !field.is_present() {
        return Err(QueryError::schema(op, field_path));
    }
    let edges = field
        .get("edges")
        .value()
        .and_then(Value::as_array)
        .ok_or_else(|| QueryError::schema(op, format!("{field_path}.edges")))?;
    let has_next_page = field
        .path(&["pageInfo", "hasNextPage"])
        .bool()
        .ok_or_else(|| QueryError::schema(op, format!("{field_path}.pageInfo.hasNextPage")))?;
    let end_cursor = field.path(&["pageInfo", "endCursor"]).string();
    if has_next_page && end_cursor.is_none() {
        return Err(QueryError::schema(
            op,
            format!("{field_path}.pageInfo.endCursor"),
        ));
    }

    let items = edges
        .iter()
        .filter_map(|edge| Nav::new(edge).get("node").value().cloned())
        .collect();

    Ok(CursorPage {
        items,
        page_info: CursorPageInfo {
            has_next_page,
            end_cursor,
        },
    })
}
