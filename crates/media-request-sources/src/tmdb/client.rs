use crate::error::SourceError;
use crate::http::require;
use crate::tmdb::api;
use crate::traits::{MetadataProvider, SearchHit};
use async_trait::async_trait;
use media_request_config::Settings;
use media_request_models::Classification;
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: Option<String>,
}

impl TmdbClient {
    pub fn new(client: Arc<Client>, settings: &Settings) -> Self {
        Self {
            client,
            base_url: settings.tmdb_base_url.clone(),
            api_key: settings.tmdb_api_key.clone(),
        }
    }


    fn api_key(&self) -> Result<&str, SourceError> {
        require(&self.api_key, "TMDB_API_KEY")
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    async fn search(&self, query: &str, classification: Classification) -> Result<Vec<SearchHit>, SourceError> {
        api::search(&self.client, &self.base_url, self.api_key()?, query, classification).await
    }

    async fn genres(&self, tmdb_id: u64, classification: Classification) -> Result<Vec<String>, SourceError> {
        api::genres(&self.client, &self.base_url, self.api_key()?, tmdb_id, classification).await
    }

    async fn tvdb_id(&self, tmdb_id: u64) -> Result<Option<u64>, SourceError> {
        api::tvdb_id(&self.client, &self.base_url, self.api_key()?, tmdb_id).await
    }
}
