use std::{collections::HashMap, fs, path::Path, time::Duration};

use serde::Deserialize;
use url::Url;

use crate::error::GalleryError;

pub const DEFAULT_CONFIG_FILE: &str = "gallery.toml";
pub const DEFAULT_BASE_URL: &str = "http://192.168.1.172:8080/api/images";
pub const DEFAULT_MAX_FILES_PER_UPLOAD: usize = 50;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GalleryConfig {
    pub base_url: String,
    pub max_files_per_upload: usize,
    pub request_timeout_secs: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            max_files_per_upload: DEFAULT_MAX_FILES_PER_UPLOAD,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl GalleryConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// A zero timeout would fail every request immediately, so it falls back
    /// to the default.
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Parses the base url and strips trailing slashes so endpoint suffixes
    /// can be appended with a single `/`.
    pub fn normalized_base_url(&self) -> Result<String, GalleryError> {
        normalize_base_url(&self.base_url)
    }
}

pub fn load_settings() -> GalleryConfig {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Defaults, then the flat `key = "value"` file at `path` if it exists, then
/// environment overrides.
pub fn load_settings_from(path: &Path) -> GalleryConfig {
    let mut settings = GalleryConfig::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            apply_file_values(&mut settings, &file_cfg);
        } else {
            tracing::warn!(path = %path.display(), "ignoring unparsable gallery config file");
        }
    }

    if let Ok(v) = std::env::var("GALLERY_BASE_URL") {
        settings.base_url = v;
    }
    if let Ok(v) = std::env::var("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Ok(v) = std::env::var("APP__MAX_FILES_PER_UPLOAD") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.max_files_per_upload = parsed;
        }
    }

    if let Ok(v) = std::env::var("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) if parsed > 0 => settings.request_timeout_secs = parsed,
            _ => tracing::warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
        }
    }

    settings
}

fn apply_file_values(settings: &mut GalleryConfig, file_cfg: &HashMap<String, toml::Value>) {
    if let Some(v) = file_cfg.get("base_url").and_then(toml::Value::as_str) {
        settings.base_url = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("max_files_per_upload")
        .and_then(value_as_u64)
        .and_then(|v| usize::try_from(v).ok())
    {
        settings.max_files_per_upload = v;
    }
    if let Some(v) = file_cfg
        .get("request_timeout_secs")
        .and_then(value_as_u64)
        .filter(|secs| *secs > 0)
    {
        settings.request_timeout_secs = v;
    }
}

fn value_as_u64(value: &toml::Value) -> Option<u64> {
    match value {
        toml::Value::Integer(v) => u64::try_from(*v).ok(),
        toml::Value::String(v) => v.trim().parse().ok(),
        _ => None,
    }
}

fn normalize_base_url(raw: &str) -> Result<String, GalleryError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| GalleryError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "unsupported scheme '{}', expected http or https",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(trimmed.to_string())
}
