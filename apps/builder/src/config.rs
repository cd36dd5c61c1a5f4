use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Builder configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub resume_service_url: String,
    /// Bearer token of the signed-in user. Unset for guest sessions.
    pub access_token: Option<String>,
    /// Address the session was opened with; may carry a share-link fragment.
    pub open_url: Option<String>,
    pub cache_dir: PathBuf,
    pub autosave_debounce: Duration,
    pub save_status_display: Duration,
    /// Also write the local cache when saving to the remote service.
    pub warm_local_cache: bool,
    pub pdf_converter_cmd: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            resume_service_url: "http://127.0.0.1:8000".to_string(),
            access_token: None,
            open_url: None,
            cache_dir: PathBuf::from(".builder-cache"),
            autosave_debounce: Duration::from_millis(1200),
            save_status_display: Duration::from_millis(1500),
            warm_local_cache: false,
            pdf_converter_cmd: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        let var = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: parse_or(var("PORT"), "PORT", defaults.port)?,
            rust_log: var("RUST_LOG").unwrap_or(defaults.rust_log),
            resume_service_url: var("RESUME_SERVICE_URL").unwrap_or(defaults.resume_service_url),
            access_token: var("BUILDER_ACCESS_TOKEN"),
            open_url: var("BUILDER_OPEN_URL"),
            cache_dir: var("BUILDER_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            autosave_debounce: millis(var("AUTOSAVE_DEBOUNCE_MS"), "AUTOSAVE_DEBOUNCE_MS")?
                .unwrap_or(defaults.autosave_debounce),
            save_status_display: millis(var("SAVE_STATUS_DISPLAY_MS"), "SAVE_STATUS_DISPLAY_MS")?
                .unwrap_or(defaults.save_status_display),
            warm_local_cache: parse_or(var("WARM_LOCAL_CACHE"), "WARM_LOCAL_CACHE", false)?,
            pdf_converter_cmd: var("PDF_CONVERTER_CMD"),
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn millis(raw: Option<String>, key: &str) -> Result<Option<Duration>> {
    raw.map(|raw| parse_or(Some(raw), key, 0u64).map(Duration::from_millis))
        .transpose()
}
