use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::UtcOffset;

use crate::format::{Locale, Zone};

const API_URL_ENV: &str = "TMTRKR_API_URL";

/// Which zone the record listing starts in; toggled at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimezoneMode {
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Root URL of the tmtrkr server, e.g. "http://localhost:8000"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Fixed offset such as "+02:00" used instead of the system's local offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<String>,
    #[serde(default)]
    pub timezone: TimezoneMode,
    #[serde(default)]
    pub locale: Locale,
    /// tracing filter directive; RUST_LOG takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            utc_offset: None,
            timezone: TimezoneMode::default(),
            locale: Locale::default(),
            log_level: default_log_level(),
        }
    }
}

pub fn root_path() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Cannot determine config directory")?
        .join("tmtrkr-tui"))
}

impl TrackerConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(root_path()?.join("config.toml"))
    }

    /// Load config from disk and apply environment overrides. Returns the
    /// default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        if let Ok(api_url) = std::env::var(API_URL_ENV) {
            config.api_url = api_url;
        }
        Ok(config)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    /// Write the default config if none exists yet; returns its path.
    pub fn ensure_exists() -> Result<PathBuf> {
        let path = Self::config_path()?;
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
        Ok(())
    }

    /// The local zone: the configured offset, else `detected`, else UTC.
    pub fn local_zone(&self, detected: Option<UtcOffset>) -> Result<Zone> {
        let offset = match &self.utc_offset {
            Some(raw) => parse_offset(raw)
                .with_context(|| format!("Invalid utc_offset {:?} (use +HH:MM)", raw))?,
            None => detected.unwrap_or(UtcOffset::UTC),
        };
        Ok(Zone::Local(offset))
    }
}

fn parse_offset(raw: &str) -> Option<UtcOffset> {
    UtcOffset::parse(
        raw.trim(),
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .ok()
}
