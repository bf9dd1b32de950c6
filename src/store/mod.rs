//! Content-addressed store client
//!
//! Two halves of the store boundary:
//! - [`fetch`]: read content back through the retrieval gateway. Failures
//!   degrade to empty content so one unreachable object never blocks a
//!   duplicate check.
//! - [`ingest`]: push an uploaded file into the store and receive the
//!   store-assigned content address.

pub mod fetch;
pub mod ingest;

pub use fetch::{ContentSource, FetchedContent, FetcherConfig, GatewayFetcher};
pub use ingest::{IngestConfig, StoreIngest};
