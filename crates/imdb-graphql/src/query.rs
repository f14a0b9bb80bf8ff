//! Query text builders.
//!
//! Queries are composed from a caller-supplied field selection and a list of
//! [`FilterClause`]s, each rendered by its own variant. Every line of the final
//! text is trimmed because the service rejects oversized request bodies.

use serde::{Deserialize, Serialize};

use crate::id::EntityKind;

/// Page size requested from connection fields.
///
/// Large on purpose so the server's own limit drives pagination.
pub const MAX_PAGE_SIZE: u32 = 9999;

/// Relationship filter for the `relations` connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    /// Sons and daughters.
    Children,
    /// Mother and father.
    Parents,
    /// Any other relative.
    Others,
}

impl RelationshipType {
    /// Enum literal used by the schema.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Children => "CHILDREN",
            Self::Parents => "PARENTS",
            Self::Others => "OTHERS",
        }
    }
}

/// Sort order literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Enum literal used by the schema.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One clause appended after the pagination arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterClause {
    /// `filter: {categories: [...]}`
    Categories(Vec<String>),
    /// `filter: {relationshipTypes: ...}`
    RelationshipType(RelationshipType),
    /// `filter: {excludeCategories: "..."}`
    ExcludeCategories(String),
    /// `sort: {by: ..., order: ...}`
    Sort {
        /// Sort key literal, e.g. `PRESTIGIOUS`.
        by: String,
        /// Sort direction.
        order: SortOrder,
    },
    /// Award nomination filter; renders nothing when both parts are unset.
    Awards {
        /// Only nominations that were won.
        wins_only: bool,
        /// Restrict to one award event, e.g. `ev0000003`.
        event: Option<String>,
    },
    /// Pre-rendered clause inserted verbatim.
    Raw(String),
}

impl FilterClause {
    /// Render the clause including its leading `", "` separator.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Categories(categories) => {
                format!(", filter: {{categories: [{}]}}", quote_all(categories))
            }
            Self::RelationshipType(kind) => {
                format!(", filter: {{relationshipTypes: {}}}", kind.as_str())
            }
            Self::ExcludeCategories(category) => {
                format!(", filter: {{excludeCategories: {}}}", quote(category))
            }
            Self::Sort { by, order } => {
                format!(", sort: {{by: {by}, order: {}}}", order.as_str())
            }
            Self::Awards { wins_only, event } => {
                let event = event.as_deref().map(str::trim).filter(|e| !e.is_empty());
                let mut parts = Vec::new();
                if *wins_only {
                    parts.push("wins: WINS_ONLY".to_string());
                }
                if let Some(event) = event {
                    parts.push(format!("events: {}", quote(event)));
                }
                if parts.is_empty() {
                    String::new()
                } else {
                    format!(", filter: {{{}}}", parts.join(", "))
                }
            }
            Self::Raw(text) => text.clone(),
        }
    }
}

/// Render a GraphQL string literal.
pub(crate) fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn quote_all(values: &[String]) -> String {
    values
        .iter()
        .map(|value| quote(value))
        .collect::<Vec<_>>()
        .join(",")
}

/// Trim every line of `query`.
#[must_use]
pub fn compact_lines(query: &str) -> String {
    query.lines().map(str::trim).collect::<Vec<_>>().join("\n")
}

/// Build a paginated query over one connection field of an entity.
///
/// The query takes `$id` and `$after` and selects
/// `edges { node { <node_fragment> } }` plus `pageInfo { endCursor hasNextPage }`.
#[must_use]
pub fn build_paged_query(
    operation_name: &str,
    root_kind: EntityKind,
    field_name: &str,
    node_fragment: &str,
    filters: &[FilterClause],
) -> String {
    let mut filter_text = String::new();
    for filter in filters {
        filter_text.push_str(&filter.render());
    }

    let query = format!(
        "query {operation_name}($id: ID!, $after: ID) {{
  {root}(id: $id) {{
    {field_name}(first: {MAX_PAGE_SIZE}, after: $after{filter_text}) {{
      edges {{
        node {{
          {node_fragment}
        }}
      }}
      pageInfo {{
        endCursor
        hasNextPage
      }}
    }}
  }}
}}",
        root = root_kind.root_field(),
    );
    compact_lines(&query)
}

/// Build a non-paginated query selecting fields of one entity.
#[must_use]
pub fn build_entity_query(operation_name: &str, root_kind: EntityKind, selection: &str) -> String {
    let query = format!(
        "query {operation_name}($id: ID!) {{
  {root}(id: $id) {{
    {selection}
  }}
}}",
        root = root_kind.root_field(),
    );
    compact_lines(&query)
}
