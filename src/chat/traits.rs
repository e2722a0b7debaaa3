use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

use super::message::ChatMessage;
use super::stream::StreamResponse;
use super::usage::Usage;

/// Fragments of a streamed completion, in arrival order.
pub type CompletionStream =
    Pin<Box<dyn Stream<Item = Result<StreamResponse, GatewayError>> + Send>>;

/// One outbound completion call.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Provider-qualified model identifier, passed through untouched
    pub model: String,
    /// Ordered conversation; system message first when present
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    /// Per-call deadline applied by the backend
    pub timeout: Option<Duration>,
}

/// Non-streaming completion body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
    #[serde(
        default,
        deserialize_with = "super::usage::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// Builds a single-choice completion. Mostly useful for test doubles.
    pub fn from_text(text: impl Into<String>, usage: Option<Usage>) -> Self {
        Self {
            choices: vec![CompletionChoice {
                message: CompletionMessage {
                    content: Some(text.into()),
                },
            }],
            usage,
        }
    }

    pub fn text(&self) -> Option<String> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.clone())
    }

    pub fn usage(&self) -> Option<Usage> {
        self.usage
    }
}

/// The remote completion function every model call goes through.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<ChatCompletion, GatewayError>;

    async fn complete_stream(
        &self,
        _request: &CompletionRequest,
    ) -> Result<CompletionStream, GatewayError> {
        Err(GatewayError::InvalidRequest(
            "Streaming not supported for this provider".to_string(),
        ))
    }
}
