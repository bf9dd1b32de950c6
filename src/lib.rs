//! Hallmark - originality gateway for creative work registration
//!
//! Hallmark accepts a creative work upload, stores the content on an
//! IPFS-compatible content-addressed store, and checks the submission
//! against every previously registered work before persisting a
//! registration record.
//!
//! ## Services
//!
//! - **Registration**: multipart upload + metadata, gated on originality
//! - **Store client**: gateway retrieval and ingest for content-addressed objects
//! - **Duplicate gate**: pairwise lexical similarity scan with early exit
//! - **Registry**: MongoDB-backed append-only record of registered works

pub mod config;
pub mod db;
pub mod routes;
pub mod server;
pub mod similarity;
pub mod store;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{HallmarkError, Result};
