pub mod config;
pub mod daemon;
pub mod prompts;
pub mod request;
pub mod search;
pub mod ui;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_request_config::{PathManager, Settings};
use tracing::warn;

/// Load effective settings; unset values are reported, not fatal
pub fn load_settings() -> Result<Settings> {
    let paths = PathManager::default();
    let settings = Settings::load(&paths).map_err(|e| eyre!("{:#}", e))?;

    let missing = settings.missing();
    if !missing.is_empty() {
        warn!(
            operation = "settings_check",
            missing = %missing.join(", "),
            "Some settings are not configured; calls that need them will fail"
        );
    }
    Ok(settings)
}
