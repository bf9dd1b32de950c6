//! Work registration and listing routes
//!
//! `POST /api/works/register` takes a multipart submission (file + metadata),
//! ingests the file into the content-addressed store, runs the duplicate
//! gate against every registered work, and persists the record only when the
//! gate clears. The three rejection classes stay distinguishable:
//!
//! - validation: 400 `{message, missing}`, emitted before any network call
//! - duplicate: 400 `{message, similarity, match}`, a business verdict
//! - internal: 500 `{message, error}`
//!
//! Listing endpoints return most-recent-first.

use bson::doc;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{header, Request, Response, StatusCode};
use multer::Multipart;
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::db::schemas::{WorkDoc, WorkStatus, WORK_COLLECTION};
use crate::routes::{error_response, internal_response, json_response};
use crate::server::AppState;

// =============================================================================
// Types
// =============================================================================

/// File part of a multipart submission
pub struct UploadedFile {
    pub name: String,
    pub data: Bytes,
}

/// Parsed registration submission, before validation
#[derive(Default)]
pub struct RegisterSubmission {
    pub title: Option<String>,
    pub category: Option<String>,
    pub creator: Option<String>,
    pub wallet_id: Option<String>,
    pub status: Option<String>,
    pub file: Option<UploadedFile>,
}

impl RegisterSubmission {
    /// Names of required fields that are absent or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        fn blank(value: &Option<String>) -> bool {
            value.as_deref().map_or(true, |s| s.trim().is_empty())
        }

        let mut missing = Vec::new();
        if blank(&self.title) {
            missing.push("title");
        }
        if blank(&self.category) {
            missing.push("category");
        }
        if blank(&self.creator) {
            missing.push("creator");
        }
        if blank(&self.wallet_id) {
            missing.push("wallet_id");
        }
        if self.file.is_none() {
            missing.push("file");
        }
        missing
    }
}

/// Work record as returned to API callers
#[derive(Debug, Serialize)]
pub struct WorkSummary {
    pub id: String,
    pub title: String,
    pub category: String,
    pub creator: String,
    pub wallet_id: String,
    pub content_address: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<String>,
}

impl WorkSummary {
    pub fn from_doc(doc: &WorkDoc) -> Self {
        Self {
            id: doc._id.map(|id| id.to_hex()).unwrap_or_default(),
            title: doc.title.clone(),
            category: doc.category.clone(),
            creator: doc.creator.clone(),
            wallet_id: doc.wallet_id.clone(),
            content_address: doc.content_address.clone(),
            status: doc.status.as_str(),
            registered_at: doc
                .registered_at
                .and_then(|dt| dt.try_to_rfc3339_string().ok()),
        }
    }
}

// =============================================================================
// Multipart parsing
// =============================================================================

/// Extract the multipart boundary from a request's Content-Type
pub(crate) fn multipart_boundary(req: &Request<Incoming>) -> Option<String> {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
}

/// Parse a buffered multipart body into a submission
///
/// Unknown fields are ignored. `type` is accepted as an alias for
/// `category` for compatibility with older clients.
pub(crate) async fn parse_submission(
    body: Bytes,
    boundary: String,
) -> Result<RegisterSubmission, multer::Error> {
    let stream = futures_util::stream::once(async move { Ok::<Bytes, Infallible>(body) });
    let mut multipart = Multipart::new(stream, boundary);

    let mut submission = RegisterSubmission::default();
    while let Some(field) = multipart.next_field().await? {
        // Field::bytes()/text() consume the field, so take the name first
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await?;
                submission.file = Some(UploadedFile {
                    name: file_name,
                    data,
                });
            }
            Some("title") => submission.title = Some(field.text().await?),
            Some("category") | Some("type") => submission.category = Some(field.text().await?),
            Some("creator") => submission.creator = Some(field.text().await?),
            Some("wallet_id") => submission.wallet_id = Some(field.text().await?),
            Some("status") => submission.status = Some(field.text().await?),
            _ => {}
        }
    }

    Ok(submission)
}

// =============================================================================
// Route handlers
// =============================================================================

/// Handle POST /api/works/register
pub async fn handle_register_work(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Response<Full<Bytes>> {
    let Some(boundary) = multipart_boundary(&req) else {
        return error_response(StatusCode::BAD_REQUEST, "Expected multipart/form-data");
    };

    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, "Failed to read registration body");
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

    // Validation happens before any store or registry traffic
    let missing = submission.missing_fields();
    if !missing.is_empty() {
        return json_response(
            StatusCode::BAD_REQUEST,
            &serde_json::json!({ "message": "Missing required fields", "missing": missing }),
        );
    }

    let status = match submission.status.as_deref() {
        None => WorkStatus::default(),
        Some(value) if value.trim().is_empty() => WorkStatus::default(),
        Some(value) => match WorkStatus::parse(value) {
            Some(status) => status,
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("Unknown status '{}'", value),
                )
            }
        },
    };

    let Some(ref mongo) = state.mongo else {
        return internal_response("Registry unavailable");
    };
    let works = match mongo.collection::<WorkDoc>(WORK_COLLECTION).await {
        Ok(works) => works,
        Err(e) => return internal_response(&e.to_string()),
    };

    // Validated above
    let file = submission.file.expect("file field validated");
    let file_name = file.name.clone();

    let address = match state.ingest.add(file.data, &file_name).await {
        Ok(address) => address,
        Err(e) => {
            error!(error = %e, filename = %file_name, "Content store ingest failed");
            return internal_response(&e.to_string());
        }
    };

    // Existing registrations, most recent first; this order drives the scan
    let existing = match works
        .find_many(doc! {}, Some(doc! { "registered_at": -1 }))
        .await
    {
        Ok(existing) => existing,
        Err(e) => return internal_response(&e.to_string()),
    };
    let existing_addresses: Vec<String> = existing
        .iter()
        .map(|work| work.content_address.clone())
        .collect();

    let verdict = state.gate.check(&address, &existing_addresses).await;
    if verdict.copied {
        let similarity = verdict.similarity.unwrap_or_default();
        return json_response(
            StatusCode::BAD_REQUEST,
            &serde_json::json!({
                "message": format!(
                    "Copied work detected: {:.1}% similar to an existing registration",
                    similarity
                ),
                "similarity": similarity,
                "match": verdict.match_address,
            }),
        );
    }

    let work = WorkDoc::new(
        submission.title.expect("title validated"),
        submission.category.expect("category validated"),
        submission.creator.expect("creator validated"),
        submission.wallet_id.expect("wallet_id validated"),
        address,
        status,
    );

    let id = match works.insert_one(work.clone()).await {
        Ok(id) => id,
        Err(e) => {
            error!(error = %e, "Failed to persist registration");
            return internal_response(&e.to_string());
        }
    };

    info!(
        registration_id = %id.to_hex(),
        title = %work.title,
        wallet_id = %work.wallet_id,
        address = %work.content_address,
        "Work registered"
    );

    let mut registered = work;
    registered._id = Some(id);

    json_response(
        StatusCode::CREATED,
        &serde_json::json!({
            "message": "Work successfully registered",
            "registration_id": id.to_hex(),
            "work": WorkSummary::from_doc(&registered),
        }),
    )
}

/// Handle GET /api/works
pub async fn handle_list_works(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let Some(ref mongo) = state.mongo else {
        return internal_response("Registry unavailable");
    };
    let works = match mongo.collection::<WorkDoc>(WORK_COLLECTION).await {
        Ok(works) => works,
        Err(e) => return internal_response(&e.to_string()),
    };

    match works
        .find_many(doc! {}, Some(doc! { "registered_at": -1 }))
        .await
    {
        Ok(found) => {
            let data: Vec<WorkSummary> = found.iter().map(WorkSummary::from_doc).collect();
            json_response(
                StatusCode::OK,
                &serde_json::json!({ "count": data.len(), "data": data }),
            )
        }
        Err(e) => internal_response(&e.to_string()),
    }
}

/// Handle GET /api/works/wallet/{wallet_id}
pub async fn handle_works_by_wallet(
    state: Arc<AppState>,
    wallet_id: &str,
) -> Response<Full<Bytes>> {
    if wallet_id.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Wallet ID parameter is missing");
    }

    let Some(ref mongo) = state.mongo else {
        return internal_response("Registry unavailable");
    };
    let works = match mongo.collection::<WorkDoc>(WORK_COLLECTION).await {
        Ok(works) => works,
        Err(e) => return internal_response(&e.to_string()),
    };

    match works
        .find_many(
            doc! { "wallet_id": wallet_id },
            Some(doc! { "registered_at": -1 }),
        )
        .await
    {
        Ok(found) => {
            let data: Vec<WorkSummary> = found.iter().map(WorkSummary::from_doc).collect();
            json_response(
                StatusCode::OK,
                &serde_json::json!({ "wallet_id": wallet_id, "count": data.len(), "data": data }),
            )
        }
        Err(e) => internal_response(&e.to_string()),
    }
}
