//! HTTP server implementation
//!
//! hyper http1 with TokioIo and a match-based dispatch table. Each
//! connection runs on its own task; handlers share [`AppState`].

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Args;
use crate::db::MongoClient;
use crate::routes;
use crate::similarity::{DuplicateGate, GateConfig};
use crate::store::{FetcherConfig, GatewayFetcher, IngestConfig, StoreIngest};
use crate::types::HallmarkError;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Registration store; absent only in dev mode without MongoDB
    pub mongo: Option<MongoClient>,
    /// Content-addressed store ingest client
    pub ingest: Arc<StoreIngest>,
    /// Duplicate gate over the store's retrieval gateway
    pub gate: Arc<DuplicateGate>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Wire the store clients and the gate from configuration
    pub fn new(args: Args, mongo: Option<MongoClient>) -> Self {
        let fetcher = Arc::new(GatewayFetcher::new(FetcherConfig {
            gateway_url: args.ipfs_gateway_url.clone(),
            timeout: std::time::Duration::from_millis(args.fetch_timeout_ms),
        }));

        let ingest = Arc::new(StoreIngest::new(IngestConfig {
            api_url: args.ipfs_api_url.clone(),
            ..IngestConfig::default()
        }));

        let gate = Arc::new(DuplicateGate::new(
            fetcher,
            GateConfig {
                threshold: args.similarity_threshold,
                fetch_concurrency: args.fetch_concurrency,
            },
        ));

        Self {
            args,
            mongo,
            ingest,
            gate,
            started_at: Instant::now(),
        }
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<(), HallmarkError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Hallmark listening on {} as node {}",
        state.args.listen, state.args.node_id
    );

    if state.args.dev_mode {
        warn!("Development mode enabled");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    let response = match (method, path.as_str()) {
        // Liveness probe
        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            routes::health_check(Arc::clone(&state))
        }

        // Version info for deployment verification
        (Method::GET, "/version") => routes::version_info(),

        // CORS preflight
        (Method::OPTIONS, _) => preflight_response(),

        // Register a work: upload + duplicate gate + persist
        (Method::POST, "/api/works/register") => {
            routes::handle_register_work(req, Arc::clone(&state)).await
        }

        // Upload only; returns the assigned content address
        (Method::POST, "/api/upload") => routes::handle_upload(req, Arc::clone(&state)).await,

        // All registered works, most recent first
        (Method::GET, "/api/works") => routes::handle_list_works(Arc::clone(&state)).await,

        // Works registered by one wallet
        (Method::GET, p) if p.starts_with("/api/works/wallet/") => {
            let wallet_id = p.strip_prefix("/api/works/wallet/").unwrap_or("");
            routes::handle_works_by_wallet(Arc::clone(&state), wallet_id).await
        }

        _ => not_found_response(&path),
    };

    Ok(response)
}

/// CORS preflight response
fn preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// 404 response
fn not_found_response(path: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "message": format!("Not found: {}", path) });

    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_path() {
        let response = not_found_response("/nope");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_preflight_allows_post() {
        let response = preflight_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let allow = response
            .headers()
            .get("Access-Control-Allow-Methods")
            .unwrap();
        assert!(allow.to_str().unwrap().contains("POST"));
    }
}
