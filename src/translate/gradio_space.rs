use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::error::UpstreamError;
use super::interface::TranslateInterface;
use super::payload_from_text;
use crate::config_manager::GradioSpaceConfig;
use crate::utils::sse::{SseEvent, SseParser};

/// Client for a model hosted as a Gradio space.
///
/// A prediction is two requests: `POST .../call/{api}` queues the job and
/// returns an event id, then `GET .../call/{api}/{event_id}` streams
/// server-sent events until the job completes or fails.
pub struct GradioSpaceClient {
    http: Client,
    root_url: String,
    api_prefix: String,
    api_name: String,
    hf_token: Option<String>,
}

impl GradioSpaceClient {
    pub fn new(config: &GradioSpaceConfig) -> Self {
        let root_url = resolve_space_url(&config.space_id);
        info!(
            "Initialized GradioSpaceClient: space={}, root_url={}, api_name={}",
            config.space_id, root_url, config.api_name
        );
        Self {
            http: Client::new(),
            root_url,
            api_prefix: normalize_prefix(&config.api_prefix),
            api_name: config.api_name.trim_matches('/').to_string(),
            hf_token: config.hf_token.clone(),
        }
    }

    fn call_url(&self) -> String {
        format!("{}{}/call/{}", self.root_url, self.api_prefix, self.api_name)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.hf_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Queue the prediction and return its event id
    async fn submit(&self, text: &str) -> Result<String, UpstreamError> {
        let response = self
            .authorize(self.http.post(self.call_url()))
            .json(&json!({ "data": [text] }))
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let payload = payload_from_text(&response.text().await?);
        match payload.get("event_id").and_then(Value::as_str) {
            Some(event_id) => Ok(event_id.to_string()),
            None => Err(UpstreamError::Malformed { payload }),
        }
    }

    /// Follow the event stream for `event_id` until a result arrives
    async fn await_result(&self, event_id: &str) -> Result<String, UpstreamError> {
        let url = format!("{}/{}", self.call_url(), event_id);
        let response = self.authorize(self.http.get(url)).send().await?;
        let response = ensure_success(response).await?;

        let mut stream = response.bytes_stream();
        let mut parser = SseParser::new();
        let mut pending: Vec<u8> = Vec::new();

        while let Some(chunk) = stream.next().await {
            pending.extend_from_slice(&chunk?);
            let text = drain_utf8(&mut pending);

            for event in parser.push(&text) {
                if let Some(result) = handle_event(event)? {
                    return Ok(result);
                }
            }
        }

        if !pending.is_empty() {
            let tail = String::from_utf8_lossy(&pending).into_owned();
            for event in parser.push(&tail) {
                if let Some(result) = handle_event(event)? {
                    return Ok(result);
                }
            }
        }

        if let Some(event) = parser.finish() {
            if let Some(result) = handle_event(event)? {
                return Ok(result);
            }
        }

        Err(UpstreamError::Protocol(
            "event stream ended without a result".to_string(),
        ))
    }
}

#[async_trait]
impl TranslateInterface for GradioSpaceClient {
    async fn translate(&self, text: &str) -> Result<String, UpstreamError> {
        let event_id = self.submit(text).await?;
        debug!("Space accepted prediction, event_id={}", event_id);
        self.await_result(&event_id).await
    }

    fn provider_name(&self) -> &'static str {
        "gradio_space"
    }
}

/// Turn a space id into the root URL of the space.
///
/// Full URLs are used as given; `owner/name` maps to
/// `https://owner-name.hf.space`.
pub fn resolve_space_url(space_id: &str) -> String {
    let space_id = space_id.trim();
    if space_id.starts_with("http://") || space_id.starts_with("https://") {
        return space_id.trim_end_matches('/').to_string();
    }
    let subdomain: String = space_id
        .to_lowercase()
        .chars()
        .map(|c| if matches!(c, '/' | '.' | '_') { '-' } else { c })
        .collect();
    format!("https://{}.hf.space", subdomain)
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Decode everything buffered in `pending` except a trailing incomplete
/// UTF-8 sequence, which stays buffered for the next chunk. Invalid bytes are
/// replaced with U+FFFD.
fn drain_utf8(pending: &mut Vec<u8>) -> String {
    let mut out = String::new();
    loop {
        match std::str::from_utf8(&pending[..]) {
            Ok(s) => {
                out.push_str(s);
                pending.clear();
                return out;
            }
            Err(e) => {
                let valid = e.valid_up_to();
                match e.error_len() {
                    Some(bad) => {
                        out.push_str(&String::from_utf8_lossy(&pending[..valid + bad]));
                        pending.drain(..valid + bad);
                    }
                    None => {
                        out.push_str(&String::from_utf8_lossy(&pending[..valid]));
                        pending.drain(..valid);
                        return out;
                    }
                }
            }
        }
    }
}

async fn ensure_success(response: Response) -> Result<Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            debug!("Failed to read error body for HTTP {}: {}", status, e);
            format!("<unreadable body: {}>", e)
        }
    };
    Err(UpstreamError::Status {
        status: status.as_u16(),
        body,
    })
}

fn handle_event(event: SseEvent) -> Result<Option<String>, UpstreamError> {
    match event.event.as_str() {
        "complete" => {
            let payload = payload_from_text(&event.data);
            match payload.get(0).and_then(Value::as_str) {
                Some(result) => Ok(Some(result.to_string())),
                None => Err(UpstreamError::Malformed { payload }),
            }
        }
        "error" => {
            let message = match payload_from_text(&event.data) {
                Value::String(message) if !message.is_empty() => message,
                Value::Null => "space reported an error without details".to_string(),
                other => other.to_string(),
            };
            Err(UpstreamError::Remote(message))
        }
        other => {
            debug!("Ignoring space event: {}", other);
            Ok(None)
        }
    }
}
