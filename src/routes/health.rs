//! Health and version endpoints
//!
//! - /health, /healthz - liveness probe (is the service running?)
//! - /version - deployment verification (crate version, commit, build time)
//!
//! Liveness returns 200 whenever the process is up; the registry connection
//! state is reported in the body rather than the status code.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::routes::json_response;
use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub status: &'static str,
    pub version: &'static str,
    /// Uptime in seconds
    pub uptime: u64,
    pub timestamp: String,
    pub mode: &'static str,
    pub node_id: String,
    pub registry: RegistryHealth,
    pub store: StoreHealth,
}

/// Registration store connectivity
#[derive(Serialize)]
pub struct RegistryHealth {
    pub connected: bool,
}

/// Content-addressed store endpoints in use
#[derive(Serialize)]
pub struct StoreHealth {
    pub gateway_url: String,
    pub api_url: String,
}

#[derive(Serialize)]
struct VersionResponse {
    version: &'static str,
    commit: &'static str,
    commit_full: &'static str,
    build_time: &'static str,
    service: &'static str,
}

pub fn health_check(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let args = &state.args;

    let response = HealthResponse {
        healthy: true,
        status: if state.mongo.is_some() { "online" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        mode: if args.dev_mode { "development" } else { "production" },
        node_id: args.node_id.to_string(),
        registry: RegistryHealth {
            connected: state.mongo.is_some(),
        },
        store: StoreHealth {
            gateway_url: args.ipfs_gateway_url.clone(),
            api_url: args.ipfs_api_url.clone(),
        },
    };

    json_response(StatusCode::OK, &response)
}

pub fn version_info() -> Response<Full<Bytes>> {
    let response = VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
        commit_full: option_env!("GIT_COMMIT_FULL").unwrap_or("unknown"),
        build_time: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
        service: "hallmark",
    };

    json_response(StatusCode::OK, &response)
}
