//! Configuration for Hallmark
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use uuid::Uuid;

/// Hallmark - originality gateway for creative work registration
#[derive(Parser, Debug, Clone)]
#[command(name = "hallmark")]
#[command(about = "Originality gateway for creative work registration")]
pub struct Args {
    /// Unique node identifier for this gateway instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8081")]
    pub listen: SocketAddr,

    /// Enable development mode (MongoDB becomes optional)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "hallmark")]
    pub mongodb_db: String,

    /// Content-addressed store retrieval gateway
    /// Registered content is read back as `GET {gateway}/ipfs/{address}`
    #[arg(long, env = "IPFS_GATEWAY_URL", default_value = "http://127.0.0.1:8080")]
    pub ipfs_gateway_url: String,

    /// Content-addressed store ingest API
    /// Uploads go to `POST {api}/api/v0/add`
    #[arg(long, env = "IPFS_API_URL", default_value = "http://127.0.0.1:5001")]
    pub ipfs_api_url: String,

    /// Client-side timeout for a single gateway fetch, in milliseconds
    #[arg(long, env = "FETCH_TIMEOUT_MS", default_value = "15000")]
    pub fetch_timeout_ms: u64,

    /// Maximum number of concurrent gateway fetches during a duplicate check
    /// The check fans out over every registered work; this bounds that fan-out
    #[arg(long, env = "FETCH_CONCURRENCY", default_value = "8")]
    pub fetch_concurrency: usize,

    /// Similarity percentage at or above which a submission is rejected
    #[arg(long, env = "SIMILARITY_THRESHOLD", default_value = "80.0")]
    pub similarity_threshold: f64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.fetch_concurrency == 0 {
            return Err("FETCH_CONCURRENCY must be at least 1".to_string());
        }

        if self.fetch_timeout_ms == 0 {
            return Err("FETCH_TIMEOUT_MS must be greater than 0".to_string());
        }

        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 100.0) {
            return Err("SIMILARITY_THRESHOLD must be in (0, 100]".to_string());
        }

        if self.ipfs_gateway_url.is_empty() || self.ipfs_api_url.is_empty() {
            return Err("IPFS_GATEWAY_URL and IPFS_API_URL must be set".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_args() -> Args {
        Args::parse_from(["hallmark"])
    }

    #[test]
    fn test_defaults_are_valid() {
        let args = default_args();
        assert!(args.validate().is_ok());
        assert_eq!(args.fetch_timeout_ms, 15_000);
        assert_eq!(args.similarity_threshold, 80.0);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut args = default_args();
        args.fetch_concurrency = 0;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_threshold_bounds() {
        let mut args = default_args();
        args.similarity_threshold = 0.0;
        assert!(args.validate().is_err());

        args.similarity_threshold = 100.0;
        assert!(args.validate().is_ok());

        args.similarity_threshold = 100.1;
        assert!(args.validate().is_err());
    }
}
