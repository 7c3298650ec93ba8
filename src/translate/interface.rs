use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::UpstreamError;

/// Body of `POST /translate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
}

/// Body returned by `POST /translate`: either a translation or an error,
/// never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationResponse {
    Translated {
        translated_text: String,
    },
    Failed {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<serde_json::Value>,
    },
}

impl TranslationResponse {
    pub fn translated(text: impl Into<String>) -> Self {
        TranslationResponse::Translated {
            translated_text: text.into(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        TranslationResponse::Failed {
            error: error.into(),
            details: None,
        }
    }
}

/// Translate interface - actual translation happens in the hosted model
#[async_trait]
pub trait TranslateInterface: Send + Sync {
    /// Translate `text` with a single upstream call
    async fn translate(&self, text: &str) -> Result<String, UpstreamError>;

    /// Short identifier used in logs and the liveness message
    fn provider_name(&self) -> &'static str;
}
