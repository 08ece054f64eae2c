use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming a JSON config file.
pub const CONFIG_PATH_VAR: &str = "BFG_CONFIG";
/// Environment variable overriding [`ViewerConfig::base_url`].
pub const BASE_URL_VAR: &str = "BFG_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Viewer settings. Every field has a default, so a config file only needs
/// the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Recorder backend. Empty means "relative to the hosting page".
    pub base_url: String,
    pub profile_path: String,
    pub record_path: String,
    pub stop_path: String,

    /// Subtracted from the viewport on both axes before layout.
    pub pad_size: f64,
    pub text_offset_x: f64,
    pub text_offset_y: f64,
    /// Labels in bands this tall or shorter are emitted hidden.
    pub min_text_height: f64,
    /// Approximate label glyph width used for truncation.
    pub pixels_per_char: f64,
    /// Target spacing between time axis ticks.
    pub pixels_per_tick: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            profile_path: "profile.json".to_string(),
            record_path: "record".to_string(),
            stop_path: "stop".to_string(),
            pad_size: 10.0,
            text_offset_x: 5.0,
            text_offset_y: 14.0,
            min_text_height: 18.0,
            pixels_per_char: 10.0,
            pixels_per_tick: 100.0,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the file named by `BFG_CONFIG`, then `BFG_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => {
                let path = PathBuf::from(path);
                let data = std::fs::read(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                log::info!("loaded config from {}", path.display());
                Self::from_json(&data)?
            }
            None => Self::default(),
        };
        if let Some(url) = lookup(BASE_URL_VAR) {
            config.base_url = url;
        }
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.pad_size < 0.0 {
            return Err(ConfigError::Invalid("pad_size must be non-negative"));
        }
        if self.pixels_per_char <= 0.0 {
            return Err(ConfigError::Invalid("pixels_per_char must be positive"));
        }
        if self.pixels_per_tick <= 0.0 {
            return Err(ConfigError::Invalid("pixels_per_tick must be positive"));
        }
        Ok(())
    }

    pub fn profile_url(&self) -> String {
        self.url(&self.profile_path)
    }

    pub fn record_url(&self) -> String {
        self.url(&self.record_path)
    }

    pub fn stop_url(&self) -> String {
        self.url(&self.stop_path)
    }

    fn url(&self, path: &str) -> String {
        if self.base_url.is_empty() {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        }
    }
}
