use crate::api::client::{ApiClient, ApiError};
use crate::schedule::{OffsetSource, ScheduleError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const URL_ENV: &str = "MESSAGEHUB_URL";

/// Client settings. API credentials live in the local store, and the phone
/// number is never written anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub auth_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// IANA zone name, or "auto" to ask the OS. Unset means the host's
    /// current UTC offset applied as-is.
    pub timezone: Option<String>,
    pub store_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            auth_timeout_secs: 60,
            request_timeout_secs: 30,
            timezone: None,
            store_path: None,
        }
    }
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "messagehub", "MessageHub")
    }

    // TOML is the format; a JSON file from older installs is migrated on first load.
    pub fn toml_path() -> Option<PathBuf> {
        Some(Self::project_dirs()?.config_dir().join("messagehub.toml"))
    }

    fn legacy_json_path() -> Option<PathBuf> {
        Some(Self::project_dirs()?.config_dir().join("config.json"))
    }

    /// Settings as saved on disk, without environment overrides.
    pub fn load_file() -> Self {
        match (Self::toml_path(), Self::legacy_json_path()) {
            (Some(toml), Some(legacy)) => Self::load_from(&toml, &legacy),
            _ => Self::default(),
        }
    }

    pub fn load() -> Self {
        let mut config = Self::load_file();
        if let Ok(url) = std::env::var(URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        config
    }

    pub fn load_from(toml_path: &Path, legacy_json: &Path) -> Self {
        if let Ok(text) = fs::read_to_string(toml_path) {
            match toml::from_str::<AppConfig>(&text) {
                Ok(config) => return config,
                Err(e) => log::warn!("ignoring unreadable config {}: {}", toml_path.display(), e),
            }
        }

        if let Ok(bytes) = fs::read(legacy_json) {
            if let Ok(config) = serde_json::from_slice::<AppConfig>(&bytes) {
                log::info!("migrating {} to {}", legacy_json.display(), toml_path.display());
                if let Err(e) = config.save_to(toml_path) {
                    log::warn!("could not write migrated config: {}", e);
                }
                return config;
            }
        }

        Self::default()
    }

    pub fn save(&self) -> std::io::Result<()> {
        match Self::toml_path() {
            Some(path) => self.save_to(&path),
            None => Err(std::io::Error::new(std::io::ErrorKind::NotFound, "No config dir")),
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml = toml::to_string_pretty(self).map_err(|e| std::io::Error::other(e.to_string()))?;
        fs::write(path, toml)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn offset_source(&self) -> Result<OffsetSource, ScheduleError> {
        match self.timezone.as_deref().map(str::trim) {
            None | Some("") => Ok(OffsetSource::current_local()),
            Some("auto") => Ok(OffsetSource::detect_zone().unwrap_or_else(|| {
                log::warn!("could not detect the system time zone, using the current offset");
                OffsetSource::current_local()
            })),
            Some(name) => OffsetSource::zone(name),
        }
    }

    pub fn client(&self, token: Option<String>) -> Result<ApiClient, ApiError> {
        Ok(ApiClient::new(&self.base_url)?
            .with_timeouts(self.auth_timeout(), self.request_timeout())
            .with_token(token))
    }
}
