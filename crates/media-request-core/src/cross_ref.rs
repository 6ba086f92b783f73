use media_request_models::Classification;
use media_request_sources::{MetadataProvider, SourceError};
use tracing::debug;

/// Map a metadata id to the id the acquisition service is keyed on.
///
/// Movies are keyed on the metadata id itself. Series need the TVDB id,
/// which may be missing (`Ok(None)`); a failed lookup is an error.
pub async fn resolve_cross_ref(
    metadata: &dyn MetadataProvider,
    tmdb_id: u64,
    classification: Classification,
) -> Result<Option<u64>, SourceError> {
    match classification {
        Classification::Movie => Ok(Some(tmdb_id)),
        Classification::Tv => {
            let tvdb_id = metadata.tvdb_id(tmdb_id).await?;
            debug!(tmdb_id, ?tvdb_id, "Resolved TVDB id");
            Ok(tvdb_id)
        }
    }
}
