//! Entity identifiers and their kind prefixes.

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Kind of entity an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A person (`nm` prefix).
    Name,
    /// A film, series or episode (`tt` prefix).
    Title,
}

impl EntityKind {
    /// Prefix the service expects in front of the numeric suffix.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Name => "nm",
            Self::Title => "tt",
        }
    }

    /// Root query field for this kind.
    #[must_use]
    pub const fn root_field(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Title => "title",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root_field())
    }
}

/// Id parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} id: {input:?}")]
pub struct IdError {
    /// Expected kind.
    pub kind: EntityKind,
    /// Rejected input.
    pub input: String,
}

/// Entity id stored without its kind prefix.
///
/// Accepts both `"0001228"` and `"nm0001228"`; the suffix must be ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityId {
    kind: EntityKind,
    suffix: String,
}

impl EntityId {
    /// Parse a bare or prefixed id.
    pub fn new(kind: EntityKind, raw: &str) -> Result<Self, IdError> {
        let trimmed = raw.trim();
        let suffix = trimmed.strip_prefix(kind.prefix()).unwrap_or(trimmed);
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError {
                kind,
                input: raw.to_string(),
            });
        }
        Ok(Self {
            kind,
            suffix: suffix.to_string(),
        })
    }

    /// Shorthand for a person id.
    pub fn name(raw: &str) -> Result<Self, IdError> {
        Self::new(EntityKind::Name, raw)
    }

    /// Shorthand for a title id.
    pub fn title(raw: &str) -> Result<Self, IdError> {
        Self::new(EntityKind::Title, raw)
    }

    /// Entity kind.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Bare numeric suffix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.suffix
    }

    /// Id as sent to the service.
    #[must_use]
    pub fn prefixed(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.suffix)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.suffix)
    }
}

// Records expose the bare suffix.
impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.suffix)
    }
}
