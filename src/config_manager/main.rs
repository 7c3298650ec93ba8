use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config_manager::translation::TranslationConfig;
use crate::config_manager::utils::read_config_file;

/// Main configuration for the relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "system_config")]
    #[serde(default)]
    pub system_config: SystemConfig,

    #[serde(rename = "translation_config")]
    pub translation_config: TranslationConfig,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Returned by `GET /`. Defaults to a message naming the provider.
    #[serde(rename = "status_message")]
    pub status_message: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            status_message: None,
        }
    }
}

impl Config {
    /// Load and validate configuration from a YAML or JSON file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let value = read_config_file(path)?;
        Self::from_value(value)
    }

    /// Deserialize and validate an already parsed configuration document
    pub fn from_value(value: serde_json::Value) -> anyhow::Result<Self> {
        let mut config: Config = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the first configuration file found in `CONFIG_PATH`, `conf.yaml`,
    /// `conf.json`.
    pub fn discover() -> anyhow::Result<(Self, String)> {
        let config_paths: Vec<String> = vec![
            std::env::var("CONFIG_PATH").ok(),
            Some("conf.yaml".to_string()),
            Some("conf.json".to_string()),
        ]
        .into_iter()
        .flatten()
        .collect();

        for path in &config_paths {
            if !std::path::Path::new(path).exists() {
                debug!("No config file at {}", path);
                continue;
            }
            // A file that exists but fails validation must stop startup.
            let config = Self::load(path)
                .map_err(|e| anyhow::anyhow!("Invalid configuration in {}: {}", path, e))?;
            return Ok((config, path.clone()));
        }

        anyhow::bail!("Could not find config file. Tried: {:?}", config_paths)
    }

    pub fn validate(&mut self) -> anyhow::Result<()> {
        if self.system_config.host.trim().is_empty() {
            anyhow::bail!("system_config.host must not be empty");
        }
        if let Some(message) = &self.system_config.status_message {
            if message.trim().is_empty() {
                self.system_config.status_message = None;
            }
        }
        self.translation_config.validate()
    }

    /// Liveness message served on `GET /`
    pub fn status_message(&self) -> String {
        self.system_config.status_message.clone().unwrap_or_else(|| {
            format!(
                "Legalis API is running via {}",
                self.translation_config.provider.as_str()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_manager::translation::ProviderKind;
    use serde_json::json;

    #[test]
    fn applies_defaults() {
        let config = Config::from_value(json!({
            "translation_config": {
                "provider": "gradio_space",
                "gradio_space": { "space_id": "ranveer0323/legalis-engine" }
            }
        }))
        .unwrap();

        assert_eq!(config.system_config.host, "0.0.0.0");
        assert_eq!(config.system_config.port, 8000);
        assert!(!config.translation_config.short_circuit_empty());
        let space = config.translation_config.gradio_space.as_ref().unwrap();
        assert_eq!(space.api_name, "/translate");
        assert_eq!(space.api_prefix, "/gradio_api");
        assert_eq!(config.status_message(), "Legalis API is running via gradio_space");
    }

    #[test]
    fn custom_status_message_wins() {
        let config = Config::from_value(json!({
            "system_config": { "port": 9000, "status_message": "ok" },
            "translation_config": {
                "provider": "inference_api",
                "short_circuit_empty": false,
                "inference_api": {
                    "url": "https://api-inference.huggingface.co/models/org/model",
                    "hf_token": "hf_abc"
                }
            }
        }))
        .unwrap();

        assert_eq!(config.system_config.port, 9000);
        assert_eq!(config.status_message(), "ok");
        assert_eq!(config.translation_config.provider, ProviderKind::InferenceApi);
        assert!(!config.translation_config.short_circuit_empty());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let result = Config::from_value(json!({
            "translation_config": { "provider": "carrier_pigeon" }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn missing_translation_config_is_rejected() {
        assert!(Config::from_value(json!({ "system_config": { "port": 8000 } })).is_err());
    }
}
