//! Widget configuration
//!
//! Resolution order: built-in defaults, then an optional JSON file, then the
//! `BOOKING_API_URL` / `BOOKING_CDN_URL` environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::BookingError;

/// Used when nothing else configures the API location
pub const DEFAULT_API_URL: &str = "http://localhost:1337/api";
pub const API_URL_ENV: &str = "BOOKING_API_URL";
pub const CDN_URL_ENV: &str = "BOOKING_CDN_URL";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Connection settings for the booking API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Base URL of the booking API, without trailing slash
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Prefix for relative media URLs (avatars)
    #[serde(default)]
    pub cdn_url: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            cdn_url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WidgetConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Apply environment overrides using `lookup` (normally `std::env::var`)
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(url) = lookup(CDN_URL_ENV) {
            self.cdn_url = url;
        }
    }

    /// Defaults, then `path` if given, then the process environment
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.api_url = config.api_url.trim_end_matches('/').to_string();

        if config.api_url == DEFAULT_API_URL {
            warn!("{} is not set; falling back to {}", API_URL_ENV, DEFAULT_API_URL);
        }
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::error::Result<()> {
        let url = self.api_url.trim();
        if url.is_empty() {
            return Err(BookingError::config("api_url must be specified"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(BookingError::config("api_url must start with http:// or https://"));
        }
        if self.timeout_secs == 0 {
            return Err(BookingError::config("timeout_secs must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_valid() {
        let config = WidgetConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("widget.json");
        let config = WidgetConfig {
            api_url: "https://api.example.com/api".to_string(),
            cdn_url: "https://cdn.example.com".to_string(),
            timeout_secs: 5,
        };

        config.save_to_file(&path).expect("Should save");
        let loaded = WidgetConfig::load_from_file(&path).expect("Should load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("widget.json");
        std::fs::write(&path, r#"{"cdn_url": "https://cdn.example.com"}"#).expect("write");

        let loaded = WidgetConfig::load_from_file(&path).expect("Should load");
        assert_eq!(loaded.api_url, DEFAULT_API_URL);
        assert_eq!(loaded.timeout_secs, 10);
        assert_eq!(loaded.cdn_url, "https://cdn.example.com");
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = WidgetConfig::load_from_file("/nonexistent/widget.json").unwrap_err();
        assert!(format!("{err:#}").contains("widget.json"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = WidgetConfig::default();
        config.apply_env(|key| match key {
            API_URL_ENV => Some("https://booking.example.com/api".to_string()),
            CDN_URL_ENV => Some("https://cdn.example.com".to_string()),
            _ => None,
        });
        assert_eq!(config.api_url, "https://booking.example.com/api");
        assert_eq!(config.cdn_url, "https://cdn.example.com");

        let mut config = WidgetConfig::default();
        config.apply_env(|key| (key == API_URL_ENV).then(|| "  ".to_string()));
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = WidgetConfig {
            api_url: "ftp://example.com".to_string(),
            ..WidgetConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, BookingError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: api_url must start with http:// or https://"
        );

        let config = WidgetConfig {
            timeout_secs: 0,
            ..WidgetConfig::default()
        };
        assert!(matches!(config.validate(), Err(BookingError::Config(_))));
    }

    #[test]
    fn test_resolve_rejects_invalid_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("widget.json");
        std::fs::write(&path, r#"{"api_url": "https://api.example.com", "timeout_secs": 0}"#)
            .expect("write");

        let err = WidgetConfig::resolve(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("timeout_secs must be greater than zero"));
    }
}
