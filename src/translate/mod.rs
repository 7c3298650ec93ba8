pub mod error;
pub mod factory;
pub mod gradio_space;
pub mod inference_api;
pub mod interface;
pub mod relay;

#[cfg(test)]
pub(crate) mod mock_upstream;

pub use factory::TranslatorFactory;
pub use interface::{TranslateInterface, TranslationRequest, TranslationResponse};
pub use relay::relay_translation;

use serde_json::Value;

/// Parse an upstream body as JSON, keeping non-JSON bodies as a JSON string
pub(crate) fn payload_from_text(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
