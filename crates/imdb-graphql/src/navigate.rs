//! Safe navigation over optional JSON.
//!
//! Every step of a [`Nav`] chain tolerates a missing key, a non-object parent
//! or an explicit `null`; the chain then stays absent and every terminal
//! accessor returns `None` (or an empty iterator).

use serde_json::Value;

use crate::id::{EntityId, EntityKind};

/// Cursor into a JSON document that may point at nothing.
#[derive(Debug, Clone, Copy)]
pub struct Nav<'a>(Option<&'a Value>);

impl<'a> Nav<'a> {
    /// Start navigating at `value`.
    #[must_use]
    pub const fn new(value: &'a Value) -> Self {
        Self(Some(value))
    }

    /// A cursor pointing at nothing.
    #[must_use]
    pub const fn absent() -> Self {
        Self(None)
    }

    /// Step into object member `key`.
    #[must_use]
    pub fn get(self, key: &str) -> Self {
        Self(self.0.and_then(|value| value.get(key)).filter(|v| !v.is_null()))
    }

    /// Step through a dotted path of object members.
    #[must_use]
    pub fn path(self, keys: &[&str]) -> Self {
        keys.iter().fold(self, |nav, key| nav.get(key))
    }

    /// Underlying value, `None` when absent or `null`.
    #[must_use]
    pub fn value(self) -> Option<&'a Value> {
        self.0.filter(|value| !value.is_null())
    }

    /// Whether the cursor points at a non-null value.
    #[must_use]
    pub fn is_present(self) -> bool {
        self.value().is_some()
    }

    /// String value.
    #[must_use]
    pub fn str(self) -> Option<&'a str> {
        self.value().and_then(Value::as_str)
    }

    /// Owned string value.
    #[must_use]
    pub fn string(self) -> Option<String> {
        self.str().map(str::to_string)
    }

    /// Owned string value, `None` when empty.
    #[must_use]
    pub fn non_empty_string(self) -> Option<String> {
        self.str().filter(|s| !s.is_empty()).map(str::to_string)
    }

    /// Signed integer value.
    #[must_use]
    pub fn i64(self) -> Option<i64> {
        self.value().and_then(Value::as_i64)
    }

    /// Unsigned integer value.
    #[must_use]
    pub fn u64(self) -> Option<u64> {
        self.value().and_then(Value::as_u64)
    }

    /// Unsigned integer value that fits in `u32`.
    #[must_use]
    pub fn u32(self) -> Option<u32> {
        self.u64().and_then(|n| u32::try_from(n).ok())
    }

    /// Floating point value (integers are widened).
    #[must_use]
    pub fn f64(self) -> Option<f64> {
        self.value().and_then(Value::as_f64)
    }

    /// Boolean value.
    #[must_use]
    pub fn bool(self) -> Option<bool> {
        self.value().and_then(Value::as_bool)
    }

    /// Entity id with its kind prefix stripped; `None` when missing or malformed.
    #[must_use]
    pub fn entity_id(self, kind: EntityKind) -> Option<EntityId> {
        self.str().and_then(|raw| EntityId::new(kind, raw).ok())
    }

    /// Elements of an array value; empty when absent or not an array.
    pub fn items(self) -> impl Iterator<Item = Nav<'a>> {
        self.value()
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .map(Nav::new)
    }

    /// Collect the non-empty string at `path` of every array element, in order.
    #[must_use]
    pub fn texts(self, path: &[&str]) -> Vec<String> {
        self.items()
            .filter_map(|item| item.path(path).non_empty_string())
            .collect()
    }
}

impl<'a> From<Option<&'a Value>> for Nav<'a> {
    fn from(value: Option<&'a Value>) -> Self {
        Self(value)
    }
}
