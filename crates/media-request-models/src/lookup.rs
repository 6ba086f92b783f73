use serde::{Deserialize, Serialize};

/// An item returned by an acquisition service's lookup endpoint.
///
/// The service echoes back a full resource (images, seasons, slug...) that
/// has to be posted back when adding, so the raw document is kept alongside
/// the title used for logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LookupMatch {
    pub title: String,
    pub resource: serde_json::Value,
}

impl LookupMatch {
    pub fn new(title: impl Into<String>, resource: serde_json::Value) -> Self {
        Self {
            title: title.into(),
            resource,
        }
    }

    /// The service's own id when the item is already in its library;
    /// lookups of untracked items carry no `id` (or `0`)
    pub fn library_id(&self) -> Option<u64> {
        self.resource
            .get("id")
            .and_then(serde_json::Value::as_u64)
            .filter(|id| *id > 0)
    }
}
