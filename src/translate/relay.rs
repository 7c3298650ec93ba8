use tracing::{debug, error, info_span, warn, Instrument};
use uuid::Uuid;

use super::error::UpstreamError;
use super::interface::{TranslateInterface, TranslationResponse};

pub const MALFORMED_RESPONSE_MESSAGE: &str = "Model may still be loading. Please try again shortly.";

/// Relay one translation request to the provider and map the outcome.
///
/// Empty text is answered locally when `short_circuit_empty` is set; every
/// other input makes exactly one upstream call.
pub async fn relay_translation(
    translator: &dyn TranslateInterface,
    text: &str,
    short_circuit_empty: bool,
) -> TranslationResponse {
    if text.is_empty() && short_circuit_empty {
        debug!("Empty input, skipping upstream call");
        return TranslationResponse::translated("");
    }

    let span = info_span!(
        "translate",
        request_id = %Uuid::new_v4(),
        provider = translator.provider_name(),
    );

    async move {
        debug!("Forwarding {} chars upstream", text.chars().count());
        match translator.translate(text).await {
            Ok(translated) => TranslationResponse::translated(translated),
            Err(e) => map_upstream_error(e),
        }
    }
    .instrument(span)
    .await
}

/// Map an upstream failure onto the response body the client sees
pub fn map_upstream_error(err: UpstreamError) -> TranslationResponse {
    if err.is_cold_start() {
        warn!("Upstream is waking up: {}", err);
        return TranslationResponse::failed(cold_start_message(err.retry_after_secs()));
    }

    error!("Upstream translation failed: {}", err);
    match err {
        UpstreamError::Malformed { payload } => TranslationResponse::Failed {
            error: MALFORMED_RESPONSE_MESSAGE.to_string(),
            details: Some(payload),
        },
        other => TranslationResponse::failed(other.to_string()),
    }
}

pub fn cold_start_message(retry_after_secs: u64) -> String {
    format!(
        "Model is waking up. Please try again in {} seconds.",
        retry_after_secs
    )
}
