//! Client for an OpenAI-compatible completion gateway (LiteLLM proxy or any
//! server exposing `POST /chat/completions`).
//!
//! Model identifiers are forwarded verbatim; routing them to the right
//! upstream provider is the gateway's job.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;

use crate::chat::{
    create_sse_stream, ChatCompletion, CompletionProvider, CompletionRequest, CompletionStream,
    StreamResponse,
};
use crate::error::GatewayError;

/// Used when neither the caller nor the environment names a gateway.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/";

/// Connection settings for the gateway.
#[derive(Debug)]
pub struct GatewayConfig {
    /// Bearer token sent with every request.
    pub api_key: SecretString,
    /// Base URL; `chat/completions` is appended.
    pub base_url: String,
}

/// Client for the completion gateway.
///
/// Cloning is cheap: the configuration sits behind an `Arc` and the reqwest
/// client shares its connection pool.
#[derive(Debug, Clone)]
pub struct Gateway {
    config: Arc<GatewayConfig>,
    client: Client,
}

#[derive(Serialize)]
struct GatewayChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct GatewayChatRequest<'a> {
    model: &'a str,
    messages: Vec<GatewayChatMessage<'a>>,
    temperature: f32,
    stream: bool,
}

impl Gateway {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, api_key, base_url))
    }

    /// Creates a gateway client around an existing HTTP client.
    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            config: Arc::new(GatewayConfig {
                api_key: SecretString::new(api_key.into()),
                base_url: base_url.into(),
            }),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_request(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<RequestBuilder, GatewayError> {
        let api_key = self.config.api_key.expose_secret();
        if api_key.is_empty() {
            return Err(GatewayError::AuthError(
                "Missing gateway API key".to_string(),
            ));
        }

        let body = GatewayChatRequest {
            model: &request.model,
            messages: request
                .messages
                .iter()
                .map(|m| GatewayChatMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: request.temperature,
            stream,
        };

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("Gateway request payload: {}", json);
            }
        }

        let mut builder = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, GatewayError> {
        let resp = builder.send().await?;
        let status = resp.status();
        log::debug!("Gateway HTTP status: {}", status);
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(status_error(status, body))
    }
}

fn status_error(status: StatusCode, body: String) -> GatewayError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::AuthError(body),
        _ => GatewayError::Status {
            status: status.as_u16(),
            body,
        },
    }
}

/// Decodes one SSE event of a chat-completions stream.
///
/// Comment lines and the terminal `[DONE]` marker yield `None`.
pub(crate) fn parse_chat_chunk(event: &str) -> Result<Option<StreamResponse>, GatewayError> {
    let data = event
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    if data.is_empty() || data == "[DONE]" {
        return Ok(None);
    }
    let chunk: Value = serde_json::from_str(&data)?;
    if let Some(err) = embedded_error(&chunk) {
        return Err(err);
    }
    Ok(Some(serde_json::from_value(chunk)?))
}

/// An `{"error": ...}` object some proxies return with a 200 status.
fn embedded_error(body: &Value) -> Option<GatewayError> {
    let error = body.get("error").filter(|e| !e.is_null())?;
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .map_or_else(|| error.to_string(), str::to_string);
    Some(GatewayError::ProviderError(message))
}

#[async_trait]
impl CompletionProvider for Gateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<ChatCompletion, GatewayError> {
        log::debug!("Requesting completion from {}", request.model);
        let resp = self.send(self.build_request(request, false)?).await?;
        let raw = resp.text().await?;
        let format_error = |err: serde_json::Error| GatewayError::ResponseFormatError {
            message: err.to_string(),
            raw_response: raw.clone(),
        };
        let body: Value = serde_json::from_str(&raw).map_err(format_error)?;
        if let Some(err) = embedded_error(&body) {
            return Err(err);
        }
        let completion: ChatCompletion = serde_json::from_value(body).map_err(format_error)?;
        if completion.choices.is_empty() {
            return Err(GatewayError::ResponseFormatError {
                message: "response contained no choices".to_string(),
                raw_response: raw,
            });
        }
        Ok(completion)
    }

    async fn complete_stream(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionStream, GatewayError> {
        log::debug!("Opening completion stream for {}", request.model);
        let resp = self.send(self.build_request(request, true)?).await?;
        Ok(create_sse_stream(resp, parse_chat_chunk))
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
