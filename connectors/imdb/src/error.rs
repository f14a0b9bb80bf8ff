//! Connector error types.

use imdb_graphql::{IdError, QueryError, TransportError};
use thiserror::Error;

/// Connector errors.
#[derive(Error, Debug)]
pub enum ImdbError {
    /// Query failed
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Transport could not be built
    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),

    /// Malformed person or title id
    #[error(transparent)]
    InvalidId(#[from] IdError),

    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Config values are inconsistent
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ImdbError {
    /// Whether repeating the call may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Query(QueryError::Transport(err)) => err.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for connector operations.
pub type ImdbResult<T> = Result<T, ImdbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_failures_are_retryable() {
        let timeout = ImdbError::Query(QueryError::Transport(TransportError::Http(
            imdb_graphql::HttpErrorInfo {
                message: "timed out".to_string(),
                status_code: None,
                is_timeout: true,
                is_connect: false,
            },
        )));
        assert!(timeout.is_retryable());

        let mismatch = ImdbError::Query(QueryError::SchemaMismatch {
            operation: "Credits".to_string(),
            path: "name.credits".to_string(),
        });
        assert!(!mismatch.is_retryable());
        assert!(!ImdbError::Config("bad".to_string()).is_retryable());
    }
}
