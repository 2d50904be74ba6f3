//! Configuration management for chatbridge.
//!
//! Read once when the client initializes; the client copies the values it
//! needs and never re-reads the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub openai: OpenAiConfig,
    pub models: ModelsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default)]
    pub api_base: Option<String>,
    /// Id of the remotely configured assistant used for streaming runs.
    pub assistant_id: String,
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// One (model id, sampling temperature) pair. Three slots exist, one per
/// request purpose; all are immutable after client initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSlot {
    pub id: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Chain-of-thought slot: content-kind classification.
    pub reasoning: ModelSlot,
    /// General messaging slot: text and link summaries.
    pub message: ModelSlot,
    /// Vision slot: image description.
    pub image: ModelSlot,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai: OpenAiConfig {
                api_key: None,
                api_key_env: default_api_key_env(),
                api_base: None,
                assistant_id: String::new(),
            },
            models: ModelsConfig {
                reasoning: ModelSlot {
                    id: "gpt-4o-mini".to_string(),
                    temperature: 0.0,
                },
                message: ModelSlot {
                    id: "gpt-4o-mini".to_string(),
                    temperature: 0.7,
                },
                image: ModelSlot {
                    id: "gpt-4o".to_string(),
                    temperature: 0.5,
                },
            },
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".chatbridge").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;
            toml::from_str(&content).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })?
        } else {
            Self::default()
        };

        if let Ok(api_base) = std::env::var("CHATBRIDGE_API_BASE") {
            config.openai.api_base = Some(api_base);
        }
        if let Ok(assistant_id) = std::env::var("CHATBRIDGE_ASSISTANT_ID") {
            config.openai.assistant_id = assistant_id;
        }

        Ok(config)
    }

    pub fn api_key(&self) -> Result<String> {
        if let Some(key) = &self.openai.api_key {
            if !key.is_empty() {
                return Ok(key.clone());
            }
        }
        std::env::var(&self.openai.api_key_env).with_context(|| {
            format!(
                "API key not found. Either:\n  \
                 1. Set api_key in config file: {}\n  \
                 2. Set environment variable: export {}=your-key",
                Self::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                self.openai.api_key_env
            )
        })
    }

    pub fn save_default() -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let default = Self::default();
        let content = toml::to_string_pretty(&default).context("Failed to serialize config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;
        Ok(config_path)
    }
}
