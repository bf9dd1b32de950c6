//! HTTP routes for Hallmark

pub mod health;
pub mod upload;
pub mod works;

pub use health::{health_check, version_info};
pub use upload::handle_upload;
pub use works::{handle_list_works, handle_register_work, handle_works_by_wallet};

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Create a JSON response with permissive CORS
pub(crate) fn json_response<T: Serialize>(status: StatusCode, data: &T) -> Response<Full<Bytes>> {
    let body = serde_json::to_string(data)
        .unwrap_or_else(|_| r#"{"message":"Serialization failed"}"#.to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// Rejection carrying only a message (validation-class failures)
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, &serde_json::json!({ "message": message }))
}

/// Internal failure: "something broke on our end"
///
/// Distinct in shape from validation and duplicate rejections so callers
/// can branch on the three cases.
pub(crate) fn internal_response(detail: &str) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &serde_json::json!({ "message": "Server error", "error": detail }),
    )
}
