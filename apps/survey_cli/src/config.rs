use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use survey_client::DEFAULT_COLLECTION_URL;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_COLLECTION_URL.into(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `path` if it exists, then environment overrides.
pub fn load_settings(path: &Path) -> Settings {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, file_cfg),
            Err(err) => warn!(path = %path.display(), %err, "config: ignoring unreadable settings file"),
        },
        Err(_) => debug!(path = %path.display(), "config: no settings file, using defaults"),
    }

    if let Ok(v) = std::env::var("SURVEY_API_URL") {
        settings.api_url = v;
    }
    if let Ok(v) = std::env::var("APP__API_URL") {
        settings.api_url = v;
    }
    if let Ok(v) = std::env::var("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.api_url {
        settings.api_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
}

/// Checks the collection url is absolute http(s) and strips a trailing slash.
pub fn normalize_api_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).with_context(|| format!("invalid survey api url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("survey api url '{raw}' must use http or https");
    }
    Ok(trimmed.to_string())
}
