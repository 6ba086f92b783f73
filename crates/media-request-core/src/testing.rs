//! In-memory stand-ins for the external services.

use async_trait::async_trait;
use media_request_models::{Classification, CompletedRequest, LookupMatch, NewRequest, PendingRequest};
use media_request_sources::{AcquisitionService, MetadataProvider, RequestStore, SearchHit, SourceError, TitleSuggester};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn hit(tmdb_id: u64, name: &str, release_date: Option<&str>) -> SearchHit {
    SearchHit {
        tmdb_id,
        name: name.to_string(),
        release_date: release_date.map(str::to_string),
    }
}

fn unavailable(service: &'static str) -> SourceError {
    SourceError::http(service, 503, "unavailable")
}

#[derive(Default)]
pub struct FakeMetadata {
    results: HashMap<String, Vec<SearchHit>>,
    genres: HashMap<u64, Vec<String>>,
    tvdb_ids: HashMap<u64, u64>,
    fail_search: bool,
    fail_genres: bool,
    fail_external_ids: bool,
    searched: Mutex<Vec<String>>,
}

impl FakeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.results.insert(query.to_string(), hits);
        self
    }

    pub fn with_genres(mut self, tmdb_id: u64, genres: &[&str]) -> Self {
        self.genres.insert(tmdb_id, genres.iter().map(|g| g.to_string()).collect());
        self
    }

    pub fn with_tvdb_id(mut self, tmdb_id: u64, tvdb_id: u64) -> Self {
        self.tvdb_ids.insert(tmdb_id, tvdb_id);
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn failing_genres(mut self) -> Self {
        self.fail_genres = true;
        self
    }

    pub fn failing_external_ids(mut self) -> Self {
        self.fail_external_ids = true;
        self
    }

    pub fn searched(&self) -> Vec<String> {
        self.searched.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataProvider for FakeMetadata {
    async fn search(&self, query: &str, _classification: Classification) -> Result<Vec<SearchHit>, SourceError> {
        self.searched.lock().unwrap().push(query.to_string());
        if self.fail_search {
            return Err(unavailable("tmdb"));
        }
        Ok(self.results.get(query).cloned().unwrap_or_default())
    }

    async fn genres(&self, tmdb_id: u64, _classification: Classification) -> Result<Vec<String>, SourceError> {
        if self.fail_genres {
            return Err(unavailable("tmdb"));
        }
        Ok(self.genres.get(&tmdb_id).cloned().unwrap_or_default())
    }

    async fn tvdb_id(&self, tmdb_id: u64) -> Result<Option<u64>, SourceError> {
        if self.fail_external_ids {
            return Err(unavailable("tmdb"));
        }
        Ok(self.tvdb_ids.get(&tmdb_id).copied())
    }
}

pub struct FakeSuggester {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl FakeSuggester {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TitleSuggester for FakeSuggester {
    async fn suggest_titles(&self, _query: &str, _classification: Classification) -> Result<String, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().ok_or_else(|| unavailable("deepseek"))
    }
}

/// Archived rows disappear from later listings, as they do in Notion
#[derive(Default)]
pub struct FakeStore {
    rows: Mutex<Vec<PendingRequest>>,
    created: Mutex<Vec<NewRequest>>,
    completed: Mutex<Vec<CompletedRequest>>,
    archived: Mutex<Vec<String>>,
    fail_list: bool,
    fail_create_titles: HashSet<String>,
    /// Remaining completed-row writes to fail; `usize::MAX` fails forever
    fail_completed: AtomicUsize,
    fail_archive: bool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, rows: Vec<PendingRequest>) -> Self {
        *self.rows.lock().unwrap() = rows;
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_create_for(mut self, title: &str) -> Self {
        self.fail_create_titles.insert(title.to_string());
        self
    }

    pub fn failing_completed(mut self) -> Self {
        self.fail_completed = AtomicUsize::new(usize::MAX);
        self
    }

    pub fn failing_completed_once(mut self) -> Self {
        self.fail_completed = AtomicUsize::new(1);
        self
    }

    pub fn failing_archive(mut self) -> Self {
        self.fail_archive = true;
        self
    }

    pub fn created(&self) -> Vec<NewRequest> {
        self.created.lock().unwrap().clone()
    }

    pub fn completed(&self) -> Vec<CompletedRequest> {
        self.completed.lock().unwrap().clone()
    }

    pub fn archived(&self) -> Vec<String> {
        self.archived.lock().unwrap().clone()
    }
}

#[async_trait]
impl RequestStore for FakeStore {
    async fn list_requests(&self) -> Result<Vec<PendingRequest>, SourceError> {
        if self.fail_list {
            return Err(unavailable("notion"));
        }
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn create_request(&self, request: &NewRequest) -> Result<(), SourceError> {
        if self.fail_create_titles.contains(&request.title) {
            return Err(SourceError::http("notion", 400, "validation_error"));
        }
        self.created.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn create_completed(&self, completed: &CompletedRequest) -> Result<(), SourceError> {
        let remaining = self.fail_completed.load(Ordering::SeqCst);
        if remaining > 0 {
            if remaining != usize::MAX {
                self.fail_completed.store(remaining - 1, Ordering::SeqCst);
            }
            return Err(unavailable("notion"));
        }
        self.completed.lock().unwrap().push(completed.clone());
        Ok(())
    }

    async fn archive_request(&self, page_id: &str) -> Result<(), SourceError> {
        if self.fail_archive {
            return Err(unavailable("notion"));
        }
        self.rows.lock().unwrap().retain(|row| row.page_id != page_id);
        self.archived.lock().unwrap().push(page_id.to_string());
        Ok(())
    }
}

pub struct FakeAcquisition {
    name: &'static str,
    /// Lookup results by cross-reference id; adding an item gives it a
    /// library `id`, as the real services do
    known: Mutex<HashMap<u64, LookupMatch>>,
    fail_lookup: bool,
    reject_add: bool,
    lookups: Mutex<Vec<u64>>,
    added: Mutex<Vec<LookupMatch>>,
}

impl FakeAcquisition {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            known: Mutex::new(HashMap::new()),
            fail_lookup: false,
            reject_add: false,
            lookups: Mutex::new(Vec::new()),
            added: Mutex::new(Vec::new()),
        }
    }

    pub fn knowing(self, cross_ref_id: u64, title: &str) -> Self {
        let resource = json!({ "title": title, "titleSlug": title.to_lowercase().replace(' ', "-") });
        self.known.lock().unwrap().insert(cross_ref_id, LookupMatch::new(title, resource));
        self
    }

    /// Like [`knowing`](Self::knowing), but already in the library
    pub fn tracking(self, cross_ref_id: u64, title: &str) -> Self {
        let resource = json!({ "id": 7, "title": title });
        self.known.lock().unwrap().insert(cross_ref_id, LookupMatch::new(title, resource));
        self
    }

    pub fn failing_lookup(mut self) -> Self {
        self.fail_lookup = true;
        self
    }

    pub fn rejecting_add(mut self) -> Self {
        self.reject_add = true;
        self
    }

    pub fn lookups(&self) -> Vec<u64> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn added(&self) -> Vec<LookupMatch> {
        self.added.lock().unwrap().clone()
    }
}

#[async_trait]
impl AcquisitionService for FakeAcquisition {
    fn service_name(&self) -> &'static str {
        self.name
    }

    async fn lookup(&self, cross_ref_id: u64) -> Result<Option<LookupMatch>, SourceError> {
        self.lookups.lock().unwrap().push(cross_ref_id);
        if self.fail_lookup {
            return Err(unavailable(self.name));
        }
        Ok(self.known.lock().unwrap().get(&cross_ref_id).cloned())
    }

    async fn add(&self, item: &LookupMatch) -> Result<(), SourceError> {
        if self.reject_add {
            return Err(SourceError::http(self.name, 400, "already been added"));
        }
        let mut added = self.added.lock().unwrap();
        added.push(item.clone());
        let library_id = added.len();
        for known in self.known.lock().unwrap().values_mut() {
            if known.title == item.title {
                known.resource["id"] = json!(library_id);
            }
        }
        Ok(())
    }
}
