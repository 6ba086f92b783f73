use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Pre-issued API tokens, kept apart from `config.toml` in `credentials.toml`.
///
/// The file is a flat table of `key = "value"`; an empty value counts as
/// unset so the template written by `config init` can be filled in place.
pub struct CredentialStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl CredentialStore {
    pub const NOTION_TOKEN: &'static str = "notion_token";
    pub const TMDB_API_KEY: &'static str = "tmdb_api_key";
    pub const DEEPSEEK_API_KEY: &'static str = "deepseek_api_key";
    pub const SONARR_API_KEY: &'static str = "sonarr_api_key";
    pub const RADARR_API_KEY: &'static str = "radarr_api_key";

    pub const KEYS: [&'static str; 5] = [
        Self::NOTION_TOKEN,
        Self::TMDB_API_KEY,
        Self::DEEPSEEK_API_KEY,
        Self::SONARR_API_KEY,
        Self::RADARR_API_KEY,
    ];

    /// An empty store bound to `path`; nothing is read
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            values: BTreeMap::new(),
        }
    }

    /// Read `path`; a missing file is an empty store
    pub fn open(path: PathBuf) -> Result<Self> {
        let mut store = Self::new(path);
        if store.path.exists() {
            let content = std::fs::read_to_string(&store.path)
                .with_context(|| format!("Failed to read {}", store.path.display()))?;
            store.values = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", store.path.display()))?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.values.get(key).filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Write every known key (empty when unset) so the file documents itself.
    /// The file is readable by the owner only.
    pub fn write_template(&self) -> Result<()> {
        let mut table = self.values.clone();
        for key in Self::KEYS {
            table.entry(key.to_string()).or_default();
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string(&table)?)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    pub fn notion_token(&self) -> Option<&String> {
        self.get(Self::NOTION_TOKEN)
    }

    pub fn tmdb_api_key(&self) -> Option<&String> {
        self.get(Self::TMDB_API_KEY)
    }

    pub fn deepseek_api_key(&self) -> Option<&String> {
        self.get(Self::DEEPSEEK_API_KEY)
    }

    pub fn sonarr_api_key(&self) -> Option<&String> {
        self.get(Self::SONARR_API_KEY)
    }

    pub fn radarr_api_key(&self) -> Option<&String> {
        self.get(Self::RADARR_API_KEY)
    }
}
