use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quality profile sent with every add request unless overridden
pub const DEFAULT_QUALITY_PROFILE_ID: u32 = 1;

/// Non-secret settings, stored in `config.toml`.
///
/// Every section and field has a default so a missing or partial file still
/// loads; absent values surface later as failed calls.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub notion: NotionConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub deepseek: DeepseekConfig,
    #[serde(default)]
    pub sonarr: ArrConfig,
    #[serde(default)]
    pub radarr: ArrConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NotionConfig {
    #[serde(default = "default_notion_base_url")]
    pub base_url: String,
    #[serde(default = "default_notion_version")]
    pub version: String,
    /// Database new requests are written to and polled from
    #[serde(default)]
    pub database_id: String,
    /// Database fulfilled requests are copied into
    #[serde(default)]
    pub completed_database_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TmdbConfig {
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DeepseekConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_deepseek_base_url")]
    pub base_url: String,
    #[serde(default = "default_deepseek_model")]
    pub model: String,
}

/// Sonarr or Radarr instance
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ArrConfig {
    #[serde(default)]
    pub url: String,
    /// Root folder new items are placed under
    #[serde(default)]
    pub root_folder: String,
    #[serde(default = "default_quality_profile_id")]
    pub quality_profile_id: u32,
}

fn default_true() -> bool {
    true
}

fn default_notion_base_url() -> String {
    "https://api.notion.com".to_string()
}

fn default_notion_version() -> String {
    "2022-06-28".to_string()
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_deepseek_base_url() -> String {
    "https://api.deepseek.com".to_string()
}

fn default_deepseek_model() -> String {
    "deepseek-chat".to_string()
}

fn default_quality_profile_id() -> u32 {
    DEFAULT_QUALITY_PROFILE_ID
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            base_url: default_notion_base_url(),
            version: default_notion_version(),
            database_id: String::new(),
            completed_database_id: String::new(),
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_tmdb_base_url(),
        }
    }
}

impl Default for DeepseekConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_deepseek_base_url(),
            model: default_deepseek_model(),
        }
    }
}

impl Default for ArrConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            root_folder: String::new(),
            quality_profile_id: DEFAULT_QUALITY_PROFILE_ID,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
