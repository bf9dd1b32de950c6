//! Registered work schema
//!
//! One document per accepted registration. A work is written only after the
//! duplicate gate cleared its content address against every address present
//! at check time; records are never updated or deleted afterwards.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for registered works
pub const WORK_COLLECTION: &str = "registered_works";

/// Lifecycle status of a registration
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WorkStatus {
    #[default]
    Registered,
    Pending,
    Rejected,
}

impl WorkStatus {
    /// Parse a submitted status value (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "registered" => Some(WorkStatus::Registered),
            "pending" => Some(WorkStatus::Pending),
            "rejected" => Some(WorkStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Registered => "Registered",
            WorkStatus::Pending => "Pending",
            WorkStatus::Rejected => "Rejected",
        }
    }
}

/// Registered work document
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct WorkDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Title of the work
    pub title: String,

    /// Category of the work (literature, music, visual, ...)
    pub category: String,

    /// Name of the creator
    pub creator: String,

    /// Wallet/account identifier of the registering owner
    pub wallet_id: String,

    /// Store-assigned content address; immutable once assigned
    pub content_address: String,

    /// Registration status
    #[serde(default)]
    pub status: WorkStatus,

    /// When the registration was accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<DateTime>,
}

impl WorkDoc {
    pub fn new(
        title: String,
        category: String,
        creator: String,
        wallet_id: String,
        content_address: String,
        status: WorkStatus,
    ) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            title,
            category,
            creator,
            wallet_id,
            content_address,
            status,
            registered_at: Some(DateTime::now()),
        }
    }
}

impl IntoIndexes for WorkDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Listing endpoints return most-recent-first
            (
                doc! { "registered_at": -1 },
                Some(
                    IndexOptions::builder()
                        .name("registered_at_desc".to_string())
                        .build(),
                ),
            ),
            // Owner listing
            (
                doc! { "wallet_id": 1 },
                Some(
                    IndexOptions::builder()
                        .name("wallet_id_index".to_string())
                        .build(),
                ),
            ),
            // Gate scans read every address
            (
                doc! { "content_address": 1 },
                Some(
                    IndexOptions::builder()
                        .name("content_address_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for WorkDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(WorkStatus::parse("Registered"), Some(WorkStatus::Registered));
        assert_eq!(WorkStatus::parse("pending"), Some(WorkStatus::Pending));
        assert_eq!(WorkStatus::parse("REJECTED"), Some(WorkStatus::Rejected));
        assert_eq!(WorkStatus::parse("archived"), None);
    }

    #[test]
    fn test_new_work_defaults() {
        let work = WorkDoc::new(
            "Nocturne".to_string(),
            "music".to_string(),
            "A. Composer".to_string(),
            "0xabc".to_string(),
            "QmExample".to_string(),
            WorkStatus::default(),
        );
        assert_eq!(work.status, WorkStatus::Registered);
        assert!(work.registered_at.is_some());
        assert!(work._id.is_none());
    }

    #[test]
    fn test_work_indexes_cover_listing_and_scan() {
        let indices = WorkDoc::into_indices();
        assert_eq!(indices.len(), 3);
        let keys: Vec<String> = indices
            .iter()
            .map(|(doc, _)| doc.keys().next().unwrap().to_string())
            .collect();
        assert!(keys.contains(&"registered_at".to_string()));
        assert!(keys.contains(&"wallet_id".to_string()));
        assert!(keys.contains(&"content_address".to_string()));
    }
}
