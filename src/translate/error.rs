use thiserror::Error;

/// Failures reported by an upstream translation provider
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model is loading (estimated time: {estimated_time:?}s)")]
    Loading { estimated_time: Option<f64> },

    #[error("Unexpected upstream response: {payload}")]
    Malformed { payload: serde_json::Value },

    #[error("Upstream prediction failed: {0}")]
    Remote(String),

    #[error("Upstream protocol error: {0}")]
    Protocol(String),
}

impl UpstreamError {
    /// True when the upstream is starting up or queueing rather than broken.
    pub fn is_cold_start(&self) -> bool {
        match self {
            UpstreamError::Loading { .. } => true,
            UpstreamError::Status { status, .. } => is_cold_start_status(*status),
            UpstreamError::Transport(e) => {
                e.is_timeout() || e.status().is_some_and(|s| is_cold_start_status(s.as_u16()))
            }
            _ => false,
        }
    }

    /// Seconds the caller should wait before retrying a cold start
    pub fn retry_after_secs(&self) -> u64 {
        match self {
            UpstreamError::Loading { estimated_time: Some(secs) } if secs.is_finite() && *secs > 0.0 => {
                secs.ceil() as u64
            }
            _ => DEFAULT_WAKE_UP_SECS,
        }
    }
}

pub const DEFAULT_WAKE_UP_SECS: u64 = 30;

fn is_cold_start_status(status: u16) -> bool {
    matches!(status, 503 | 504)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gateway_statuses_are_cold_starts() {
        for status in [503, 504] {
            let err = UpstreamError::Status { status, body: String::new() };
            assert!(err.is_cold_start(), "{status} should be a cold start");
        }
        for status in [400, 401, 404, 500, 502] {
            let err = UpstreamError::Status { status, body: String::new() };
            assert!(!err.is_cold_start(), "{status} should not be a cold start");
        }
    }

    #[tokio::test]
    async fn transport_timeout_is_a_cold_start() {
        use crate::translate::mock_upstream::spawn_upstream;
        use axum::routing::post;
        use axum::Router;
        use std::time::Duration;

        let app = Router::new().route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let root = spawn_upstream(app).await;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();
        let err: UpstreamError = client
            .post(format!("{}/slow", root))
            .send()
            .await
            .unwrap_err()
            .into();

        assert!(matches!(err, UpstreamError::Transport(_)));
        assert!(err.is_cold_start());
    }

    #[test]
    fn classification_ignores_message_text() {
        // A body mentioning 504 or a queue is not a cold start by itself.
        let err = UpstreamError::Status { status: 500, body: "504 Queue".to_string() };
        assert!(!err.is_cold_start());
        assert!(!UpstreamError::Remote("Queue is full".to_string()).is_cold_start());
        assert!(!UpstreamError::Malformed { payload: json!({"error": "504"}) }.is_cold_start());
    }

    #[test]
    fn loading_uses_estimated_time() {
        let err = UpstreamError::Loading { estimated_time: Some(20.2) };
        assert!(err.is_cold_start());
        assert_eq!(err.retry_after_secs(), 21);

        let err = UpstreamError::Loading { estimated_time: None };
        assert_eq!(err.retry_after_secs(), DEFAULT_WAKE_UP_SECS);

        let err = UpstreamError::Status { status: 504, body: String::new() };
        assert_eq!(err.retry_after_secs(), DEFAULT_WAKE_UP_SECS);
    }
}
