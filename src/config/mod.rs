//! Application configuration
//!
//! Sources are merged in order: defaults, environment variables, then the
//! first surveysim.json file found.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// AI provider type
    pub provider: String,

    /// API key
    pub api_key: Option<String>,

    /// Base URL for the API
    pub base_url: Option<String>,

    /// Model to use
    pub model: String,

    /// Maximum tokens for responses
    pub max_tokens: Option<u32>,

    /// Temperature for sampling
    pub temperature: Option<f32>,

    /// Top-p for nucleus sampling
    pub top_p: Option<f32>,

    /// Fixed delay in seconds before retrying a rate-limited request
    pub rate_limit_delay_secs: u64,

    /// Delay in milliseconds after each API call
    pub pacing_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            api_key: None,
            base_url: None,
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: None,
            temperature: None,
            top_p: None,
            rate_limit_delay_secs: 15,
            pacing_delay_ms: 1000,
        }
    }
}

impl Config {
    /// Initialize configuration from defaults, environment, and files
    pub async fn init() -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = Self::default();
        config.load_from_env();

        if let Ok(file_config) = Self::load_from_file().await {
            config.merge_with(file_config);
        }

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        if let Ok(provider) = std::env::var("SURVEYSIM_PROVIDER") {
            self.provider = provider;
        }

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if self.provider == "openai" && self.api_key.is_none() {
                self.api_key = Some(key);
            }
        }

        // Generic API key wins over provider-specific ones
        if let Ok(key) = std::env::var("SURVEYSIM_API_KEY") {
            self.api_key = Some(key);
        }

        if let Ok(base_url) = std::env::var("SURVEYSIM_BASE_URL") {
            self.base_url = Some(base_url);
        }

        if let Ok(model) = std::env::var("SURVEYSIM_MODEL") {
            self.model = model;
        }

        if let Ok(max_tokens_str) = std::env::var("SURVEYSIM_MAX_TOKENS") {
            if let Ok(max_tokens) = max_tokens_str.parse() {
                self.max_tokens = Some(max_tokens);
            }
        }

        if let Ok(temp_str) = std::env::var("SURVEYSIM_TEMPERATURE") {
            if let Ok(temperature) = temp_str.parse() {
                self.temperature = Some(temperature);
            }
        }

        if let Ok(delay_str) = std::env::var("SURVEYSIM_RATE_LIMIT_DELAY") {
            if let Ok(delay) = delay_str.parse() {
                self.rate_limit_delay_secs = delay;
            }
        }
    }

    /// Load configuration from surveysim.json files
    pub async fn load_from_file() -> Result<Self> {
        // Configuration priority:
        // 1. ./.surveysim.json
        // 2. ./surveysim.json
        // 3. $HOME/.config/surveysim/surveysim.json
        let mut config_paths = vec![
            PathBuf::from("./.surveysim.json"),
            PathBuf::from("./surveysim.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("surveysim").join("surveysim.json"));
        }

        for path in config_paths {
            if path.exists() {
                debug!("Loading configuration from: {}", path.display());
                return Self::read_config(&path).await;
            }
        }

        Err(anyhow::anyhow!("No configuration file found"))
    }

    /// Read and parse a single configuration file
    async fn read_config(path: &std::path::Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another configuration into this one
    pub fn merge_with(&mut self, other: Self) {
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if !other.model.is_empty() && other.model != Self::default().model {
            self.model = other.model;
        }
        if other.max_tokens.is_some() {
            self.max_tokens = other.max_tokens;
        }
        if other.temperature.is_some() {
            self.temperature = other.temperature;
        }
        if other.top_p.is_some() {
            self.top_p = other.top_p;
        }
        if other.rate_limit_delay_secs != Self::default().rate_limit_delay_secs {
            self.rate_limit_delay_secs = other.rate_limit_delay_secs;
        }
        if other.pacing_delay_ms != Self::default().pacing_delay_ms {
            self.pacing_delay_ms = other.pacing_delay_ms;
        }
    }

    /// Check if the configuration has a valid API key
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.has_api_key() {
            return Err(anyhow::anyhow!(
                "No API key configured. Set OPENAI_API_KEY or SURVEYSIM_API_KEY, or add one to surveysim.json. A .env file next to the binary also works."
            ));
        }

        if self.model.is_empty() {
            return Err(anyhow::anyhow!("Model is required"));
        }

        if let Some(max_tokens) = self.max_tokens {
            if max_tokens == 0 {
                return Err(anyhow::anyhow!("max_tokens must be greater than 0"));
            }
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(anyhow::anyhow!("temperature must be between 0.0 and 2.0"));
            }
        }

        if let Some(top_p) = self.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err(anyhow::anyhow!("top_p must be between 0.0 and 1.0"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed_config() -> Config {
        Config {
            api_key: Some("test-key".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.provider, "openai");
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.rate_limit_delay_secs, 15);
        assert_eq!(config.pacing_delay_ms, 1000);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_validate_requires_api_key() {
        let config = Config::default();
        assert!(config.validate().is_err());
        assert!(keyed_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_api_key() {
        let config = Config {
            api_key: Some(String::new()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ranges() {
        let config = Config {
            temperature: Some(3.0),
            ..keyed_config()
        };
        assert!(config.validate().is_err());

        let config = Config {
            top_p: Some(1.5),
            ..keyed_config()
        };
        assert!(config.validate().is_err());

        let config = Config {
            max_tokens: Some(0),
            ..keyed_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_with() {
        let mut config = Config::default();
        config.merge_with(Config {
            api_key: Some("file-key".to_string()),
            model: "gpt-4".to_string(),
            rate_limit_delay_secs: 30,
            ..Config::default()
        });
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.rate_limit_delay_secs, 30);

        // defaults in the other config leave existing values alone
        let mut config = Config {
            base_url: Some("http://localhost".to_string()),
            ..keyed_config()
        };
        config.merge_with(Config::default());
        assert_eq!(config.base_url.as_deref(), Some("http://localhost"));
        assert_eq!(config.api_key.as_deref(), Some("test-key"));
    }

    #[tokio::test]
    async fn test_read_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surveysim.json");
        let config = Config {
            model: "gpt-4".to_string(),
            ..keyed_config()
        };
        tokio::fs::write(&path, serde_json::to_string(&config).unwrap())
            .await
            .unwrap();

        let loaded = Config::read_config(&path).await.unwrap();
        assert_eq!(loaded.model, "gpt-4");
        assert_eq!(loaded.api_key.as_deref(), Some("test-key"));

        let missing = Config::read_config(&dir.path().join("nope.json")).await;
        assert!(missing.is_err());
    }

    #[test]
    fn test_config_roundtrip_json() {
        let config = keyed_config();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.api_key, config.api_key);
        assert_eq!(parsed.model, config.model);
    }
}
