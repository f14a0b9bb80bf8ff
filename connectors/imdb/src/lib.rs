//! IMDb Connector
//!
//! Person accessors, file configuration and thumbnail sizing on top of the
//! `imdb-graphql` engine.
//!
//! ## Usage
//!
//! ```no_run
//! # async fn run() -> imdb_connector::ImdbResult<()> {
//! use imdb_connector::{AwardFilter, ImdbClient, ImdbConfig};
//!
//! let client = ImdbClient::new(&ImdbConfig::default())?;
//! let person = client.person("nm0000134")?;
//! println!("{:?}", person.name().await?);
//! let oscars = person.awards(&AwardFilter::all().event("ev0000003")).await?;
//! println!("{} wins", oscars.total.win);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]

mod client;
mod config;
mod error;
mod image;
mod person;
mod types;

pub use client::ImdbClient;
pub use config::{ImdbConfig, ProxyConfig, RetryConfig, SearchConfig};
pub use error::{ImdbError, ImdbResult};
pub use image::AspectCropSizer;
pub use person::Person;
pub use types::*;
