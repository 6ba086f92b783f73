use async_trait::async_trait;
use media_request_models::{Classification, CompletedRequest, LookupMatch, NewRequest, PendingRequest};
use crate::error::SourceError;

/// One raw hit from the metadata search endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub tmdb_id: u64,
    pub name: String,
    pub release_date: Option<String>,
}

/// The request database: active rows are listed, created and archived, and
/// fulfilled rows are copied into a separate completed store.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Every row of the active store, unfiltered
    async fn list_requests(&self) -> Result<Vec<PendingRequest>, SourceError>;

    async fn create_request(&self, request: &NewRequest) -> Result<(), SourceError>;

    async fn create_completed(&self, completed: &CompletedRequest) -> Result<(), SourceError>;

    /// Soft-delete a row of the active store
    async fn archive_request(&self, page_id: &str) -> Result<(), SourceError>;
}

/// Movie/TV metadata search
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn search(&self, query: &str, classification: Classification) -> Result<Vec<SearchHit>, SourceError>;

    async fn genres(&self, tmdb_id: u64, classification: Classification) -> Result<Vec<String>, SourceError>;

    /// TVDB id of a series; `Ok(None)` when the catalog has no mapping
    async fn tvdb_id(&self, tmdb_id: u64) -> Result<Option<u64>, SourceError>;
}

/// Free-text title guessing used when the metadata search finds nothing
#[async_trait]
pub trait TitleSuggester: Send + Sync {
    /// The model's raw reply; parsing is left to the caller
    async fn suggest_titles(&self, query: &str, classification: Classification) -> Result<String, SourceError>;
}

/// A download manager that can track and search for an item
#[async_trait]
pub trait AcquisitionService: Send + Sync {
    fn service_name(&self) -> &'static str;

    /// First lookup result for the cross-reference id, if any
    async fn lookup(&self, cross_ref_id: u64) -> Result<Option<LookupMatch>, SourceError>;

    /// Start tracking the item and search for it immediately
    async fn add(&self, item: &LookupMatch) -> Result<(), SourceError>;
}
