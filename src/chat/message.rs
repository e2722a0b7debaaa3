use std::fmt;

/// Who a message is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
}

impl ChatRole {
    /// Wire name used by OpenAI-compatible APIs.
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Messages for one comparison call: the system prompt (when non-empty)
    /// followed by the user prompt.
    pub fn conversation(system_prompt: Option<&str>, prompt: &str) -> Vec<ChatMessage> {
        system_prompt
            .filter(|s| !s.is_empty())
            .map(ChatMessage::system)
            .into_iter()
            .chain(std::iter::once(ChatMessage::user(prompt)))
            .collect()
    }
}
