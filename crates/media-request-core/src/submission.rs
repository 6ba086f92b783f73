use media_request_models::{Classification, NewRequest};
use media_request_sources::{RequestStore, SourceError};

/// Write one confirmed, not-yet-added request row. Store errors are returned
/// as-is and nothing is retried.
pub async fn submit_request(
    store: &dyn RequestStore,
    title: &str,
    cross_ref_id: Option<u64>,
    classification: Classification,
) -> Result<NewRequest, SourceError> {
    let request = NewRequest::new(title, classification, cross_ref_id);
    store.create_request(&request).await?;
    Ok(request)
}
