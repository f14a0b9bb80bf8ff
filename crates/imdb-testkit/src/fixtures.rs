//! Response fixtures.
//!
//! Builders for the `data` payloads the service returns.

use serde_json::{Value, json};

// ─────────────────────────────────────────────────────────────────────────────
// Connection Fixtures
// ─────────────────────────────────────────────────────────────────────────────

/// One page of `root.field`, with `nodes` wrapped as edges.
#[must_use]
pub fn connection_page(
    root: &str,
    field: &str,
    nodes: Vec<Value>,
    end_cursor: Option<&str>,
    has_next_page: bool,
) -> Value {
    let edges: Vec<Value> = nodes.into_iter().map(|node| json!({ "node": node })).collect();
    json!({
        root: {
            field: {
                "edges": edges,
                "pageInfo": {
                    "endCursor": end_cursor,
                    "hasNextPage": has_next_page
                }
            }
        }
    })
}

/// Last (or only) page of a person connection.
#[must_use]
pub fn last_name_page(field: &str, nodes: Vec<Value>) -> Value {
    connection_page("name", field, nodes, None, false)
}

/// Split `nodes` into `page_size` chunks of person connection pages linked by
/// cursors `c1`, `c2`, ….
#[must_use]
pub fn name_pages(field: &str, nodes: Vec<Value>, page_size: usize) -> Vec<Value> {
    let chunks: Vec<Vec<Value>> = nodes
        .chunks(page_size.max(1))
        .map(<[Value]>::to_vec)
        .collect();
    if chunks.is_empty() {
        return vec![last_name_page(field, Vec::new())];
    }
    let count = chunks.len();
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            let has_next = i + 1 < count;
            let cursor = format!("c{}", i + 1);
            connection_page("name", field, chunk, Some(cursor.as_str()), has_next)
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Value Fixtures
// ─────────────────────────────────────────────────────────────────────────────

/// `{url, width, height}` image node.
#[must_use]
pub fn image(url: &str, width: u32, height: u32) -> Value {
    json!({ "url": url, "width": width, "height": height })
}

/// `{day, month, year}` date node.
#[must_use]
pub fn date(day: Option<u8>, month: Option<u8>, year: Option<i32>) -> Value {
    json!({ "day": day, "month": month, "year": year })
}

/// `{plainText}` markdown node.
#[must_use]
pub fn plain_text(text: &str) -> Value {
    json!({ "plainText": text })
}
