//! Engine configuration.
//!
//! Everything has a default, so an empty JSON object (or no file at all)
//! gives a working offline configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::ResolutionMode;

/// Environment variable overriding the espeak-ng binary.
pub const ESPEAK_ENV: &str = "IPASCRIBE_ESPEAK";

/// Settings for the remote dictionary source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Query the remote dictionary before local sources (RP only).
    pub enabled: bool,
    pub base_url: String,
    /// Minimum spacing between two requests.
    pub cooldown_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://www.ldoceonline.com".to_string(),
            cooldown_ms: 1000,
            timeout_secs: 10,
            user_agent: concat!("ipascribe/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Configuration for the transcription engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub mode: ResolutionMode,
    /// Primary phonemizer: "auto", "espeak" or "rules".
    pub engine: String,
    pub espeak_binary: String,
    pub remote: RemoteConfig,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            mode: ResolutionMode::Hybrid,
            engine: "auto".to_string(),
            espeak_binary: "espeak-ng".to_string(),
            remote: RemoteConfig::default(),
        }
    }
}

impl TranscriptionConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_json(&data)
            .with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// espeak-ng binary to run; `IPASCRIBE_ESPEAK` wins over the config.
    pub fn espeak_program(&self) -> String {
        std::env::var(ESPEAK_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.espeak_binary.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TranscriptionConfig::default();
        assert_eq!(config.mode, ResolutionMode::Hybrid);
        assert_eq!(config.engine, "auto");
        assert!(!config.remote.enabled);
        assert_eq!(config.remote.cooldown_ms, 1000);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            TranscriptionConfig::from_json(r#"{"mode": "direct", "remote": {"enabled": true}}"#)
                .unwrap();
        assert_eq!(config.mode, ResolutionMode::Direct);
        assert!(config.remote.enabled);
        assert_eq!(config.remote.base_url, "https://www.ldoceonline.com");
        assert_eq!(config.engine, "auto");
    }

    #[test]
    fn test_empty_object() {
        let config = TranscriptionConfig::from_json("{}").unwrap();
        assert_eq!(config, TranscriptionConfig::default());
    }

    #[test]
    fn test_invalid_json() {
        assert!(TranscriptionConfig::from_json(r#"{"mode": "sideways"}"#).is_err());
        assert!(TranscriptionConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("ipascribe-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"engine": "rules", "espeak_binary": "/opt/espeak"}"#).unwrap();
        let config = TranscriptionConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.engine, "rules");
        assert_eq!(config.espeak_binary, "/opt/espeak");
    }

    #[test]
    fn test_load_missing_file() {
        let err = TranscriptionConfig::load(Path::new("/nonexistent/ipascribe.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config"));
    }
}
