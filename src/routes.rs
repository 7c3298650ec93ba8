use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;
use crate::translate::{relay_translation, TranslationRequest, TranslationResponse};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Liveness
        .route("/", get(home))
        .route("/translate", post(translate_text))
}

async fn home(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "message": state.config.status_message() }))
}

/// Upstream failures are reported in the body with a 200 status; only
/// unparseable requests get a 4xx.
async fn translate_text(
    State(state): State<AppState>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> Result<Json<TranslationResponse>, (StatusCode, Json<Value>)> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected translate request: {}", rejection.body_text());
        (
            rejection.status(),
            Json(json!({ "error": rejection.body_text() })),
        )
    })?;

    let response = relay_translation(
        state.translator.as_ref(),
        &request.text,
        state.config.translation_config.short_circuit_empty(),
    )
    .await;

    Ok(Json(response))
}
