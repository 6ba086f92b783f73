use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::classification::Classification;

/// Status text written on freshly submitted requests
pub const WAITING_STATUS: &str = "⏳ Waiting to be processed";

/// Status text written on completed requests
pub const ADDED_STATUS: &str = "✅ Added Successfully";

/// A request row as read back from the active request database.
///
/// Every field except the row id is optional because rows can be edited by
/// hand in the database; eligibility is decided from what is present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PendingRequest {
    pub page_id: String,
    pub title: Option<String>,
    /// Raw multi-select labels, kept verbatim so they can be copied to the
    /// completed row
    pub tags: Vec<String>,
    pub tvdb_id: Option<u64>,
    pub tmdb_id: Option<u64>,
    pub confirmed: bool,
    pub added: bool,
    pub system_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl PendingRequest {
    /// Confirmed by the user and not yet accepted by an acquisition service
    pub fn is_eligible(&self) -> bool {
        self.confirmed && !self.added
    }

    pub fn classification(&self) -> Option<Classification> {
        Classification::from_tags(&self.tags)
    }

    /// The id the acquisition service for `classification` is keyed on
    pub fn cross_ref_id(&self, classification: Classification) -> Option<u64> {
        match classification {
            Classification::Tv => self.tvdb_id,
            Classification::Movie => self.tmdb_id,
        }
    }

    /// Title, if present and not blank
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// What the submission step writes for one selected title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewRequest {
    pub title: String,
    pub classification: Classification,
    /// `None` when the cross-reference lookup found nothing
    pub cross_ref_id: Option<u64>,
}

impl NewRequest {
    pub fn new(title: impl Into<String>, classification: Classification, cross_ref_id: Option<u64>) -> Self {
        Self {
            title: title.into(),
            classification,
            cross_ref_id,
        }
    }
}

/// Shadow row created in the completed database once a request is fulfilled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletedRequest {
    pub title: String,
    pub tags: Vec<String>,
    pub classification: Classification,
    pub cross_ref_id: u64,
}

impl CompletedRequest {
    pub fn status(&self) -> &'static str {
        ADDED_STATUS
    }
}
