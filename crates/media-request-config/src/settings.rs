use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::paths::PathManager;
use anyhow::{Context, Result};
use tracing::debug;

/// Effective settings: `config.toml`, then `credentials.toml`, then the
/// environment, later sources winning.
///
/// Nothing here is validated up front. A value that is still missing after
/// all three layers only fails the calls that need it.
#[derive(Debug, Clone)]
pub struct Settings {
    pub notion_base_url: String,
    pub notion_version: String,
    pub notion_token: Option<String>,
    pub database_id: Option<String>,
    pub completed_database_id: Option<String>,
    pub tmdb_base_url: String,
    pub tmdb_api_key: Option<String>,
    pub deepseek_enabled: bool,
    pub deepseek_base_url: String,
    pub deepseek_model: String,
    pub deepseek_api_key: Option<String>,
    pub sonarr: ArrSettings,
    pub radarr: ArrSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrSettings {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub root_folder: Option<String>,
    pub quality_profile_id: u32,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl Settings {
    /// Load from the files managed by `paths` and the process environment
    pub fn load(paths: &PathManager) -> Result<Self> {
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .with_context(|| format!("Failed to load config from {}", config_file.display()))?;

        let credentials = CredentialStore::open(paths.credentials_file())?;

        Ok(Self::from_parts(&config, &credentials, |key| std::env::var(key).ok()))
    }

    /// Combine already-loaded layers; `env` looks up one environment variable
    pub fn from_parts<F>(config: &Config, credentials: &CredentialStore, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let layered = |env_key: &str, fallback: Option<String>| -> Option<String> {
            match env(env_key).as_deref().and_then(non_empty) {
                Some(value) => {
                    debug!(variable = env_key, "Setting taken from environment");
                    Some(value)
                }
                None => fallback,
            }
        };

        Self {
            notion_base_url: config.notion.base_url.clone(),
            notion_version: config.notion.version.clone(),
            notion_token: layered("NOTION_TOKEN", credentials.notion_token().cloned()),
            database_id: layered("DATABASE_ID", non_empty(&config.notion.database_id)),
            completed_database_id: layered(
                "DATABASE_ID_COMPLETED",
                non_empty(&config.notion.completed_database_id),
            ),
            tmdb_base_url: config.tmdb.base_url.clone(),
            tmdb_api_key: layered("TMDB_API_KEY", credentials.tmdb_api_key().cloned()),
            deepseek_enabled: config.deepseek.enabled,
            deepseek_base_url: config.deepseek.base_url.clone(),
            deepseek_model: config.deepseek.model.clone(),
            deepseek_api_key: layered("DEEPSEEK_API_KEY", credentials.deepseek_api_key().cloned()),
            sonarr: ArrSettings {
                url: layered("SONARR_URL", non_empty(&config.sonarr.url)),
                api_key: layered("SONARR_API_KEY", credentials.sonarr_api_key().cloned()),
                root_folder: layered("ROOT_FOLDER_TV", non_empty(&config.sonarr.root_folder)),
                quality_profile_id: config.sonarr.quality_profile_id,
            },
            radarr: ArrSettings {
                url: layered("RADARR_URL", non_empty(&config.radarr.url)),
                api_key: layered("RADARR_API_KEY", credentials.radarr_api_key().cloned()),
                root_folder: layered("ROOT_FOLDER_MOVIE", non_empty(&config.radarr.root_folder)),
                quality_profile_id: config.radarr.quality_profile_id,
            },
        }
    }

    /// Names (environment spelling) of every value that is still unset
    pub fn missing(&self) -> Vec<&'static str> {
        let checks: [(&'static str, bool); 11] = [
            ("NOTION_TOKEN", self.notion_token.is_none()),
            ("DATABASE_ID", self.database_id.is_none()),
            ("DATABASE_ID_COMPLETED", self.completed_database_id.is_none()),
            ("TMDB_API_KEY", self.tmdb_api_key.is_none()),
            ("DEEPSEEK_API_KEY", self.deepseek_enabled && self.deepseek_api_key.is_none()),
            ("SONARR_URL", self.sonarr.url.is_none()),
            ("SONARR_API_KEY", self.sonarr.api_key.is_none()),
            ("ROOT_FOLDER_TV", self.sonarr.root_folder.is_none()),
            ("RADARR_URL", self.radarr.url.is_none()),
            ("RADARR_API_KEY", self.radarr.api_key.is_none()),
            ("ROOT_FOLDER_MOVIE", self.radarr.root_folder.is_none()),
        ];
        checks
            .into_iter()
            .filter_map(|(name, missing)| missing.then_some(name))
            .collect()
    }

    /// Key/value listing for display; secrets are masked unless `full`
    pub fn describe(&self, full: bool) -> Vec<(&'static str, String)> {
        let plain = |v: &Option<String>| v.clone().unwrap_or_else(|| "<unset>".to_string());
        let secret = |v: &Option<String>| match v {
            Some(value) if full => value.clone(),
            Some(value) => mask(value),
            None => "<unset>".to_string(),
        };

        vec![
            ("notion.base_url", self.notion_base_url.clone()),
            ("notion.version", self.notion_version.clone()),
            ("notion.token", secret(&self.notion_token)),
            ("notion.database_id", plain(&self.database_id)),
            ("notion.completed_database_id", plain(&self.completed_database_id)),
            ("tmdb.base_url", self.tmdb_base_url.clone()),
            ("tmdb.api_key", secret(&self.tmdb_api_key)),
            ("deepseek.enabled", self.deepseek_enabled.to_string()),
            ("deepseek.base_url", self.deepseek_base_url.clone()),
            ("deepseek.model", self.deepseek_model.clone()),
            ("deepseek.api_key", secret(&self.deepseek_api_key)),
            ("sonarr.url", plain(&self.sonarr.url)),
            ("sonarr.api_key", secret(&self.sonarr.api_key)),
            ("sonarr.root_folder", plain(&self.sonarr.root_folder)),
            ("sonarr.quality_profile_id", self.sonarr.quality_profile_id.to_string()),
            ("radarr.url", plain(&self.radarr.url)),
            ("radarr.api_key", secret(&self.radarr.api_key)),
            ("radarr.root_folder", plain(&self.radarr.root_folder)),
            ("radarr.quality_profile_id", self.radarr.quality_profile_id.to_string()),
        ]
    }
}

/// Keep the last four characters of a secret
fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
