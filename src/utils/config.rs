use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const ENDPOINT_ENV: &str = "QUADIM_ENDPOINT";

/// What to do with a response that belongs to an older submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaleResponsePolicy {
    /// Only the most recent submission may update the result area.
    #[default]
    DiscardStale,
    /// Whichever response arrives last overwrites the result area.
    LastResolvedWins,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub stale_responses: StaleResponsePolicy,
    pub log_filter: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 120,
            stale_responses: StaleResponsePolicy::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl StudioConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }

    /// Load `config.toml` from the platform config directory, writing the
    /// defaults there first if it does not exist.
    pub fn load() -> Result<Self> {
        let project_dirs = project_dirs()?;
        let config_dir = project_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).with_context(|| {
                format!("Failed to create config directory {:?}", config_dir)
            })?;
        }

        let path = config_dir.join("config.toml");
        let config = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {:?}", path))?;
            Self::from_toml_str(&content)?
        } else {
            let config = Self::default();
            let content =
                toml::to_string(&config).context("Failed to serialize default config")?;
            fs::write(&path, content)
                .with_context(|| format!("Failed to write config file {:?}", path))?;
            info!("Wrote default configuration to {:?}", path);
            config
        };

        Ok(config.with_env_overrides())
    }

    pub fn with_env_overrides(self) -> Self {
        self.apply_endpoint_override(std::env::var(ENDPOINT_ENV).ok())
    }

    /// Replace `endpoint` with a non-blank override value
    pub fn apply_endpoint_override(mut self, value: Option<String>) -> Self {
        if let Some(endpoint) = value {
            let endpoint = endpoint.trim();
            if !endpoint.is_empty() {
                self.endpoint = endpoint.to_string();
            }
        }
        self
    }
}

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "quadim", "quadim-studio")
        .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))
}

/// Directory for rolling log files
pub fn log_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = StudioConfig::from_toml_str("").unwrap();
        assert_eq!(config, StudioConfig::default());
        assert_eq!(config.stale_responses, StaleResponsePolicy::DiscardStale);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = StudioConfig::from_toml_str(
            r#"
            endpoint = "http://render.local:8080"
            stale_responses = "last-resolved-wins"
            "#,
        )
        .unwrap();

        assert_eq!(config.endpoint, "http://render.local:8080");
        assert_eq!(config.stale_responses, StaleResponsePolicy::LastResolvedWins);
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        assert!(StudioConfig::from_toml_str(r#"stale_responses = "first-wins""#).is_err());
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let config = StudioConfig {
            request_timeout_secs: 0,
            ..StudioConfig::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_endpoint_override_replaces_endpoint() {
        let config = StudioConfig::default()
            .apply_endpoint_override(Some("  http://render.local:9000 ".to_string()));
        assert_eq!(config.endpoint, "http://render.local:9000");
        assert_eq!(config.request_timeout_secs, 120);
    }

    #[test]
    fn test_blank_endpoint_override_is_ignored() {
        for value in ["", "   ", "\t\n"] {
            let config = StudioConfig::default().apply_endpoint_override(Some(value.to_string()));
            assert_eq!(config.endpoint, StudioConfig::default().endpoint);
        }
    }

    #[test]
    fn test_missing_endpoint_override_keeps_file_value() {
        let config = StudioConfig {
            endpoint: "http://from-file:7000".to_string(),
            ..StudioConfig::default()
        }
        .apply_endpoint_override(None);
        assert_eq!(config.endpoint, "http://from-file:7000");
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let content = toml::to_string(&StudioConfig::default()).unwrap();
        assert_eq!(
            StudioConfig::from_toml_str(&content).unwrap(),
            StudioConfig::default()
        );
    }
}
