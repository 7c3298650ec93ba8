use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::info;

use super::error::UpstreamError;
use super::interface::TranslateInterface;
use super::payload_from_text;
use crate::config_manager::InferenceApiConfig;

/// Client for a REST inference endpoint (`{"inputs": text}` in,
/// `[{"generated_text": ...}]` out)
pub struct InferenceApiClient {
    http: Client,
    url: String,
    hf_token: String,
}

impl InferenceApiClient {
    pub fn new(config: &InferenceApiConfig) -> Self {
        info!("Initialized InferenceApiClient: url={}", config.url);
        Self {
            http: Client::new(),
            url: config.url.trim().to_string(),
            hf_token: config.hf_token.clone().unwrap_or_default(),
        }
    }
}

#[async_trait]
impl TranslateInterface for InferenceApiClient {
    async fn translate(&self, text: &str) -> Result<String, UpstreamError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.hf_token)
            .json(&json!({ "inputs": text }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_failure(status, body));
        }

        extract_translation(payload_from_text(&body))
    }

    fn provider_name(&self) -> &'static str {
        "inference_api"
    }
}

/// Pull the translated text out of a successful response body
pub fn extract_translation(payload: Value) -> Result<String, UpstreamError> {
    let text = payload
        .as_array()
        .and_then(|items| items.first())
        .and_then(|first| {
            first
                .get("generated_text")
                .or_else(|| first.get("translation_text"))
        })
        .and_then(Value::as_str)
        .map(str::to_string);

    text.ok_or(UpstreamError::Malformed { payload })
}

fn classify_failure(status: StatusCode, body: String) -> UpstreamError {
    if status == StatusCode::SERVICE_UNAVAILABLE {
        let payload = payload_from_text(&body);
        if payload.get("error").is_some() {
            return UpstreamError::Loading {
                estimated_time: payload.get("estimated_time").and_then(Value::as_f64),
            };
        }
    }
    UpstreamError::Status {
        status: status.as_u16(),
        body,
    }
}
