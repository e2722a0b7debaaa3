use serde::{Deserialize, Deserializer, Serialize};

/// Token usage reported by the provider for one completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UsageFields")]
pub struct Usage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total number of tokens used
    pub total_tokens: u32,
}

/// Wire shape of a usage block; every field is optional.
#[derive(Deserialize)]
struct UsageFields {
    #[serde(default, alias = "input_tokens")]
    prompt_tokens: Option<u32>,
    #[serde(default, alias = "output_tokens")]
    completion_tokens: Option<u32>,
    #[serde(default)]
    total_tokens: Option<u32>,
}

impl TryFrom<UsageFields> for Usage {
    type Error = String;

    fn try_from(fields: UsageFields) -> Result<Self, Self::Error> {
        let (Some(prompt_tokens), Some(completion_tokens)) =
            (fields.prompt_tokens, fields.completion_tokens)
        else {
            return Err("usage needs both prompt and completion token counts".to_string());
        };
        Ok(Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: fields
                .total_tokens
                .unwrap_or(prompt_tokens.saturating_add(completion_tokens)),
        })
    }
}

/// Reads an optional usage block, treating an incomplete or malformed one as
/// absent so it never fails the response carrying it.
pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<Option<Usage>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match serde_json::from_value(value) {
        Ok(usage) => Some(usage),
        Err(err) => {
            log::debug!("Ignoring unreadable usage block: {err}");
            None
        }
    }))
}
