//! Document schemas for the registration store

pub mod work;

pub use work::{WorkDoc, WorkStatus, WORK_COLLECTION};

use bson::DateTime;
use serde::{Deserialize, Serialize};

/// Common metadata shared by all documents
///
/// Tracks creation, update, and soft-deletion timestamps. Work records are
/// append-only; the soft-delete flag exists for operator tooling and is
/// filtered out of every read.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Metadata {
    /// Whether this document has been soft-deleted
    #[serde(default)]
    pub is_deleted: bool,

    /// When the document was soft-deleted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime>,

    /// When the document was last updated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,

    /// When the document was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
}

impl Metadata {
    pub fn new() -> Self {
        Self {
            is_deleted: false,
            deleted_at: None,
            updated_at: Some(DateTime::now()),
            created_at: Some(DateTime::now()),
        }
    }
}
