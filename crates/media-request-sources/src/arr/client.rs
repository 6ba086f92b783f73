use crate::arr::api::{self, Instance};
use crate::error::SourceError;
use crate::http::require;
use crate::traits::AcquisitionService;
use async_trait::async_trait;
use media_request_config::ArrSettings;
use media_request_models::LookupMatch;
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrKind {
    Sonarr,
    Radarr,
}

impl ArrKind {
    pub fn service_name(&self) -> &'static str {
        match self {
            ArrKind::Sonarr => "sonarr",
            ArrKind::Radarr => "radarr",
        }
    }

    fn resource(&self) -> &'static str {
        match self {
            ArrKind::Sonarr => "series",
            ArrKind::Radarr => "movie",
        }
    }

    /// Field of the lookup resource holding the id the service is keyed on
    fn id_field(&self) -> &'static str {
        match self {
            ArrKind::Sonarr => "tvdbId",
            ArrKind::Radarr => "tmdbId",
        }
    }

    pub fn lookup_term(&self, cross_ref_id: u64) -> String {
        match self {
            ArrKind::Sonarr => format!("tvdb:{}", cross_ref_id),
            ArrKind::Radarr => format!("tmdb:{}", cross_ref_id),
        }
    }

    fn setting_names(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            ArrKind::Sonarr => ("SONARR_URL", "SONARR_API_KEY", "ROOT_FOLDER_TV"),
            ArrKind::Radarr => ("RADARR_URL", "RADARR_API_KEY", "ROOT_FOLDER_MOVIE"),
        }
    }

    fn add_options(&self) -> Value {
        match self {
            ArrKind::Sonarr => json!({ "monitor": "all", "searchForMissingEpisodes": true }),
            ArrKind::Radarr => json!({ "searchForMovie": true }),
        }
    }

    /// Add body built from a lookup resource: identifying fields are copied
    /// back verbatim, placement and monitoring come from settings
    pub fn add_payload(&self, item: &LookupMatch, root_folder: &str, quality_profile_id: u32) -> Value {
        let source = &item.resource;
        let mut body = Map::new();

        for field in [self.id_field(), "title", "titleSlug", "year"] {
            if let Some(value) = source.get(field).filter(|v| !v.is_null()) {
                body.insert(field.to_string(), value.clone());
            }
        }
        body.entry("title").or_insert_with(|| json!(item.title));
        body.insert("images".to_string(), source.get("images").cloned().unwrap_or_else(|| json!([])));
        if *self == ArrKind::Sonarr {
            body.insert("seasons".to_string(), source.get("seasons").cloned().unwrap_or_else(|| json!([])));
        }
        body.insert("qualityProfileId".to_string(), json!(quality_profile_id));
        body.insert("rootFolderPath".to_string(), json!(root_folder));
        body.insert("monitored".to_string(), json!(true));
        body.insert("addOptions".to_string(), self.add_options());

        Value::Object(body)
    }
}

/// Sonarr or Radarr, depending on `kind`
#[derive(Clone)]
pub struct ArrClient {
    client: Arc<Client>,
    kind: ArrKind,
    settings: ArrSettings,
}

impl ArrClient {
    pub fn new(client: Arc<Client>, kind: ArrKind, settings: ArrSettings) -> Self {
        Self { client, kind, settings }
    }



    fn instance(&self) -> Result<Instance<'_>, SourceError> {
        let (url, api_key, _) = self.kind.setting_names();
        Ok(Instance {
            service: self.kind.service_name(),
            url: require(&self.settings.url, url)?,
            api_key: require(&self.settings.api_key, api_key)?,
        })
    }
}

#[async_trait]
impl AcquisitionService for ArrClient {
    fn service_name(&self) -> &'static str {
        self.kind.service_name()
    }

    async fn lookup(&self, cross_ref_id: u64) -> Result<Option<LookupMatch>, SourceError> {
        let instance = self.instance()?;
        let term = self.kind.lookup_term(cross_ref_id);
        let results = api::lookup(&self.client, instance, self.kind.resource(), &term).await?;

        Ok(results.into_iter().next().map(|resource| {
            let title = resource
                .get("title")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| term.clone());
            LookupMatch::new(title, resource)
        }))
    }

    async fn add(&self, item: &LookupMatch) -> Result<(), SourceError> {
        let instance = self.instance()?;
        let (_, _, root_setting) = self.kind.setting_names();
        let root_folder = require(&self.settings.root_folder, root_setting)?;

        let body = self.kind.add_payload(item, root_folder, self.settings.quality_profile_id);
        api::add(&self.client, instance, self.kind.resource(), &body).await?;

        info!(
            operation = "add",
            service = self.kind.service_name(),
            title = %item.title,
            root_folder,
            "Added to acquisition service"
        );
        Ok(())
    }
}
