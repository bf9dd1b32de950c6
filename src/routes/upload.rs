//! Standalone upload route
//!
//! `POST /api/upload` ingests a file into the content-addressed store and
//! returns the assigned address without registering anything. Kept for
//! clients that upload first and submit the registration separately.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;
use tracing::{error, warn};

use crate::routes::works::{multipart_boundary, parse_submission};
use crate::routes::{error_response, internal_response, json_response};
use crate::server::AppState;

/// Handle POST /api/upload
pub async fn handle_upload(req: Request<Incoming>, state: Arc<AppState>) -> Response<Full<Bytes>> {
    let Some(boundary) = multipart_boundary(&req) else {
        return error_response(StatusCode::BAD_REQUEST, "Expected multipart/form-data");
    };

    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, "Failed to read upload body");
            return error_response(StatusCode::BAD_REQUEST, "Failed to read request body");
        }
    };

    let submission = match parse_submission(body, boundary).await {
        Ok(submission) => submission,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("Malformed multipart body: {}", e),
            )
        }
    };

    let Some(file) = submission.file else {
        return json_response(
            StatusCode::BAD_REQUEST,
            &serde_json::json!({ "message": "Missing required fields", "missing": ["file"] }),
        );
    };

    let file_name = file.name.clone();
    match state.ingest.add(file.data, &file_name).await {
        Ok(address) => json_response(
            StatusCode::OK,
            &serde_json::json!({ "content_address": address }),
        ),
        Err(e) => {
            error!(error = %e, filename = %file_name, "Content store ingest failed");
            internal_response(&e.to_string())
        }
    }
}
