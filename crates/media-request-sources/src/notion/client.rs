use crate::error::SourceError;
use crate::http::require;
use crate::notion::api::{self, Endpoint};
use crate::notion::page;
use crate::traits::RequestStore;
use async_trait::async_trait;
use media_request_config::Settings;
use media_request_models::{CompletedRequest, NewRequest, PendingRequest};
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info};

/// Request store backed by two Notion databases: the active queue and the
/// completed archive.
#[derive(Clone)]
pub struct NotionClient {
    client: Arc<Client>,
    base_url: String,
    version: String,
    token: Option<String>,
    database_id: Option<String>,
    completed_database_id: Option<String>,
}

impl NotionClient {
    pub fn new(client: Arc<Client>, settings: &Settings) -> Self {
        Self {
            client,
            base_url: settings.notion_base_url.clone(),
            version: settings.notion_version.clone(),
            token: settings.notion_token.clone(),
            database_id: settings.database_id.clone(),
            completed_database_id: settings.completed_database_id.clone(),
        }
    }


    fn endpoint(&self) -> Result<Endpoint<'_>, SourceError> {
        Ok(Endpoint {
            base_url: &self.base_url,
            token: require(&self.token, "NOTION_TOKEN")?,
            version: &self.version,
        })
    }

    fn database_id(&self) -> Result<&str, SourceError> {
        require(&self.database_id, "DATABASE_ID")
    }

    fn completed_database_id(&self) -> Result<&str, SourceError> {
        require(&self.completed_database_id, "DATABASE_ID_COMPLETED")
    }
}

#[async_trait]
impl RequestStore for NotionClient {
    async fn list_requests(&self) -> Result<Vec<PendingRequest>, SourceError> {
        let endpoint = self.endpoint()?;
        let database_id = self.database_id()?;

        let client: &Client = &self.client;
        let pages = api::collect_pages(|cursor| async move {
            api::query_database(client, endpoint, database_id, cursor.as_deref()).await
        })
        .await?;
        let requests: Vec<PendingRequest> = pages.into_iter().map(page::Page::into_request).collect();

        debug!(count = requests.len(), "Fetched request rows");
        Ok(requests)
    }

    async fn create_request(&self, request: &NewRequest) -> Result<(), SourceError> {
        let endpoint = self.endpoint()?;
        let body = page::pending_page(self.database_id()?, request);
        api::create_page(&self.client, endpoint, &body).await?;
        info!(
            operation = "create_request",
            title = %request.title,
            classification = %request.classification,
            cross_ref_id = ?request.cross_ref_id,
            "Request row created"
        );
        Ok(())
    }

    async fn create_completed(&self, completed: &CompletedRequest) -> Result<(), SourceError> {
        let endpoint = self.endpoint()?;
        let body = page::completed_page(self.completed_database_id()?, completed);
        api::create_page(&self.client, endpoint, &body).await?;
        debug!(title = %completed.title, "Completed row created");
        Ok(())
    }

    async fn archive_request(&self, page_id: &str) -> Result<(), SourceError> {
        let endpoint = self.endpoint()?;
        api::archive_page(&self.client, endpoint, page_id).await?;
        debug!(page_id, "Request row archived");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_request_config::{Config, CredentialStore};
    use media_request_models::Classification;
    use std::path::PathBuf;

    fn unconfigured() -> NotionClient {
        let credentials = CredentialStore::new(PathBuf::from("/tmp/unused"));
        let settings = Settings::from_parts(&Config::default(), &credentials, |_| None);
        NotionClient::new(Arc::new(crate::http::create_client()), &settings)
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_any_request() {
        let client = unconfigured();
        let err = client.list_requests().await.unwrap_err();
        assert!(err.is_missing_setting());
        assert_eq!(err.to_string(), "NOTION_TOKEN is not configured");

        let err = client
            .create_request(&NewRequest::new("Dune", Classification::Movie, Some(438631)))
            .await
            .unwrap_err();
        assert!(err.is_missing_setting());
    }
}
