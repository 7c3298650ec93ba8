use serde::{Deserialize, Serialize};

use crate::config_manager::utils::is_unresolved_placeholder;

/// Which upstream translation provider the relay forwards to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    GradioSpace,
    InferenceApi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::GradioSpace => "gradio_space",
            ProviderKind::InferenceApi => "inference_api",
        }
    }
}

/// Translation relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    pub provider: ProviderKind,

    /// Answer `{"text": ""}` locally with an empty translation instead of
    /// calling the upstream. Unset means the provider's default, see
    /// [`TranslationConfig::short_circuit_empty`].
    #[serde(rename = "short_circuit_empty")]
    #[serde(default)]
    pub short_circuit_empty: Option<bool>,

    #[serde(rename = "gradio_space")]
    pub gradio_space: Option<GradioSpaceConfig>,

    #[serde(rename = "inference_api")]
    pub inference_api: Option<InferenceApiConfig>,
}

/// Configuration for a hosted Gradio space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradioSpaceConfig {
    /// `owner/name` on the hub, or the full root URL of the space
    #[serde(rename = "space_id")]
    pub space_id: String,

    #[serde(rename = "api_name")]
    #[serde(default = "default_api_name")]
    pub api_name: String,

    #[serde(rename = "api_prefix")]
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    #[serde(rename = "hf_token")]
    pub hf_token: Option<String>,
}

fn default_api_name() -> String {
    "/translate".to_string()
}

fn default_api_prefix() -> String {
    "/gradio_api".to_string()
}

/// Configuration for a REST inference endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceApiConfig {
    pub url: String,

    #[serde(rename = "hf_token")]
    pub hf_token: Option<String>,
}

impl TranslationConfig {
    /// Whether empty text is answered without an upstream call.
    ///
    /// The inference endpoint skips empty input by default; a space is
    /// always called unless configured otherwise.
    pub fn short_circuit_empty(&self) -> bool {
        self.short_circuit_empty.unwrap_or(match self.provider {
            ProviderKind::GradioSpace => false,
            ProviderKind::InferenceApi => true,
        })
    }

    /// Fill missing tokens from `HF_TOKEN` and check the selected provider
    /// section is usable.
    pub fn validate(&mut self) -> anyhow::Result<()> {
        let env_token = std::env::var("HF_TOKEN").ok();

        match self.provider {
            ProviderKind::GradioSpace => {
                let space = self.gradio_space.as_mut().ok_or_else(|| {
                    anyhow::anyhow!("translation_config.gradio_space is required for provider gradio_space")
                })?;
                if space.hf_token.is_none() {
                    space.hf_token = env_token;
                }
                space.validate()
            }
            ProviderKind::InferenceApi => {
                let api = self.inference_api.as_mut().ok_or_else(|| {
                    anyhow::anyhow!("translation_config.inference_api is required for provider inference_api")
                })?;
                if api.hf_token.is_none() {
                    api.hf_token = env_token;
                }
                api.validate()
            }
        }
    }
}

impl GradioSpaceConfig {
    pub fn validate(&mut self) -> anyhow::Result<()> {
        let space_id = self.space_id.trim();
        if space_id.is_empty() || is_unresolved_placeholder(space_id) {
            anyhow::bail!("gradio_space.space_id must be set");
        }
        if space_id.starts_with("http://") || space_id.starts_with("https://") {
            reqwest::Url::parse(space_id)
                .map_err(|e| anyhow::anyhow!("gradio_space.space_id is not a valid URL: {}", e))?;
        } else {
            let mut parts = space_id.split('/');
            let valid = matches!(
                (parts.next(), parts.next(), parts.next()),
                (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
            );
            if !valid {
                anyhow::bail!("gradio_space.space_id must look like owner/name, got {}", space_id);
            }
        }
        if self.api_name.trim_matches('/').is_empty() {
            anyhow::bail!("gradio_space.api_name must name an endpoint");
        }
        // A token left as a placeholder means the variable was never set.
        if self.hf_token.as_deref().is_some_and(|t| t.trim().is_empty() || is_unresolved_placeholder(t)) {
            self.hf_token = None;
        }
        Ok(())
    }
}

impl InferenceApiConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = reqwest::Url::parse(self.url.trim())
            .map_err(|e| anyhow::anyhow!("inference_api.url is not a valid URL: {}", e))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("inference_api.url must use http or https, got {}", url.scheme());
        }
        match self.hf_token.as_deref() {
            Some(token) if !token.trim().is_empty() && !is_unresolved_placeholder(token) => Ok(()),
            _ => anyhow::bail!("inference_api.hf_token (or HF_TOKEN) must be set"),
        }
    }
}
