//! Request and response payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GraphqlError;
use crate::id::EntityId;

/// Variables map: string keys to scalars or `null`.
pub type Variables = Map<String, Value>;

/// GraphQL request payload, serialized as the HTTP body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    /// Query text.
    pub query: String,
    /// Operation name.
    pub operation_name: String,
    /// Variables.
    pub variables: Variables,
}

impl GraphqlRequest {
    /// Create a request with no variables.
    #[must_use]
    pub fn new(query: impl Into<String>, operation_name: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            operation_name: operation_name.into(),
            variables: Variables::new(),
        }
    }

    /// Set a variable.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Set `$id` to the prefixed form of `id`.
    #[must_use]
    pub fn with_id(self, id: &EntityId) -> Self {
        self.with_variable("id", id.prefixed())
    }
}

/// GraphQL response container.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GraphqlResponse<T> {
    /// Response data.
    #[serde(default)]
    pub data: Option<T>,
    /// GraphQL errors.
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
    /// Extensions payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl<T> GraphqlResponse<T> {
    /// Returns `true` if no GraphQL errors were returned.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_wire_names() {
        let id = EntityId::name("0000206").unwrap();
        let request = GraphqlRequest::new("query Name($id: ID!) { x }", "Name")
            .with_id(&id)
            .with_variable("after", Value::Null);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "query": "query Name($id: ID!) { x }",
                "operationName": "Name",
                "variables": {"id": "nm0000206", "after": null}
            })
        );
    }
}
