use serde::{Deserialize, Serialize};

use super::usage::Usage;

/// Stream response chunk in OpenAI's chat-completions streaming format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamResponse {
    /// Array of choices in the response
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
    /// Usage metadata, only present when the gateway is asked for it
    #[serde(
        default,
        deserialize_with = "super::usage::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub usage: Option<Usage>,
}

impl StreamResponse {
    /// Content fragment of the first choice, if this chunk carries one.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
    }
}

/// Individual choice in a streaming response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamChoice {
    /// Delta containing the incremental content
    #[serde(default)]
    pub delta: StreamDelta,
}

/// Delta content in a streaming response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamDelta {
    /// The incremental content, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}
