//! IMDb Test Kit - test doubles for the GraphQL engine and its consumers.
//!
//! - [`ScriptedTransport`] - in-memory transport replaying queued payloads
//! - [`MockGraphqlServer`] - wiremock endpoint for the HTTP transport
//! - [`fixtures`] - builders for connection pages and common nodes
//! - Tracing configuration for test output
//!
//! # Example
//!
//! ```rust,ignore
//! use imdb_testkit::{ScriptedTransport, fixtures};
//!
//! #[tokio::test]
//! async fn trivia_walks_every_page() {
//!     imdb_testkit::init_test_tracing();
//!
//!     let transport = ScriptedTransport::new();
//!     for page in fixtures::name_pages("trivia", nodes, 2) {
//!         transport.push(Ok(page));
//!     }
//!     // ... build an engine over the transport and assert on the requests
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod fixtures;
mod mock_server;
mod scripted;
mod tracing_config;

pub use mock_server::*;
pub use scripted::*;
pub use tracing_config::*;
