//! Builds the full set of service clients from settings.

use crate::arr::{ArrClient, ArrKind};
use crate::deepseek::DeepseekClient;
use crate::http::create_client;
use crate::notion::NotionClient;
use crate::tmdb::TmdbClient;
use crate::traits::{AcquisitionService, MetadataProvider, RequestStore, TitleSuggester};
use media_request_config::Settings;
use std::sync::Arc;
use tracing::debug;

/// Every collaborator the workflows need, behind their seam traits so tests
/// can swap in fakes.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn RequestStore>,
    pub metadata: Arc<dyn MetadataProvider>,
    /// `None` when the title suggester is disabled in config
    pub suggester: Option<Arc<dyn TitleSuggester>>,
    pub sonarr: Arc<dyn AcquisitionService>,
    pub radarr: Arc<dyn AcquisitionService>,
}

impl Services {
    /// One shared HTTP client for every service
    pub fn from_settings(settings: &Settings) -> Self {
        let client = Arc::new(create_client());

        let suggester: Option<Arc<dyn TitleSuggester>> = if settings.deepseek_enabled {
            Some(Arc::new(DeepseekClient::new(client.clone(), settings)))
        } else {
            debug!("Title suggester disabled");
            None
        };

        Self {
            store: Arc::new(NotionClient::new(client.clone(), settings)),
            metadata: Arc::new(TmdbClient::new(client.clone(), settings)),
            suggester,
            sonarr: Arc::new(ArrClient::new(client.clone(), ArrKind::Sonarr, settings.sonarr.clone())),
            radarr: Arc::new(ArrClient::new(client, ArrKind::Radarr, settings.radarr.clone())),
        }
    }
}
