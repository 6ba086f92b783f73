pub mod config;
pub mod credentials;
pub mod paths;
pub mod settings;

pub use config::{ArrConfig, Config, DeepseekConfig, NotionConfig, TmdbConfig, DEFAULT_QUALITY_PROFILE_ID};
pub use credentials::CredentialStore;
pub use paths::{PathManager, container_base_path};
pub use settings::{ArrSettings, Settings};
