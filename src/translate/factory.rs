use std::sync::Arc;
use anyhow::Result;
use tracing::info;

use super::gradio_space::GradioSpaceClient;
use super::inference_api::InferenceApiClient;
use super::interface::TranslateInterface;
use crate::config_manager::{ProviderKind, TranslationConfig};

/// Factory for creating the configured translation provider
pub struct TranslatorFactory;

impl TranslatorFactory {
    pub fn create_translator(config: &TranslationConfig) -> Result<Arc<dyn TranslateInterface>> {
        info!("Initializing translation provider: {}", config.provider.as_str());

        match config.provider {
            ProviderKind::GradioSpace => {
                let space = config.gradio_space.as_ref().ok_or_else(|| {
                    anyhow::anyhow!("Missing gradio_space section for provider gradio_space")
                })?;
                Ok(Arc::new(GradioSpaceClient::new(space)))
            }
            ProviderKind::InferenceApi => {
                let api = config.inference_api.as_ref().ok_or_else(|| {
                    anyhow::anyhow!("Missing inference_api section for provider inference_api")
                })?;
                Ok(Arc::new(InferenceApiClient::new(api)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_manager::{GradioSpaceConfig, InferenceApiConfig};

    fn config(provider: ProviderKind) -> TranslationConfig {
        TranslationConfig {
            provider,
            short_circuit_empty: None,
            gradio_space: Some(GradioSpaceConfig {
                space_id: "ranveer0323/legalis-engine".to_string(),
                api_name: "/translate".to_string(),
                api_prefix: "/gradio_api".to_string(),
                hf_token: None,
            }),
            inference_api: Some(InferenceApiConfig {
                url: "https://api-inference.huggingface.co/models/org/model".to_string(),
                hf_token: Some("hf_abc".to_string()),
            }),
        }
    }

    #[test]
    fn selects_provider_from_config() {
        let space = TranslatorFactory::create_translator(&config(ProviderKind::GradioSpace)).unwrap();
        assert_eq!(space.provider_name(), "gradio_space");

        let api = TranslatorFactory::create_translator(&config(ProviderKind::InferenceApi)).unwrap();
        assert_eq!(api.provider_name(), "inference_api");
    }

    #[test]
    fn missing_section_is_an_error() {
        let mut cfg = config(ProviderKind::InferenceApi);
        cfg.inference_api = None;
        assert!(TranslatorFactory::create_translator(&cfg).is_err());
    }
}
