use thiserror::Error;

use crate::validate::PromptKind;

/// Errors raised by a single call to the completion gateway.
///
/// These never escape the fan-out: the executor turns them into the failing
/// model's `error` text.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// The request did not finish within the per-call timeout
    #[error("Request timed out: {0}")]
    Timeout(String),
    /// Non-success HTTP status returned by the gateway
    #[error("Gateway returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Authentication and authorization errors
    #[error("Auth error: {0}")]
    AuthError(String),
    /// Invalid request parameters or format
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Errors reported by the upstream provider inside a successful response
    #[error("Provider error: {0}")]
    ProviderError(String),
    /// API response parsing or format error
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    JsonError(String),
}

impl GatewayError {
    /// Whether a retry has a reasonable chance of succeeding.
    ///
    /// Only consulted when the retry policy is restricted to transient errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::HttpError(_) => true,
            GatewayError::Timeout(_) => true,
            GatewayError::Status { status, .. } => {
                *status == 408 || *status == 429 || *status >= 500
            }
            GatewayError::ProviderError(_) => true,
            GatewayError::ResponseFormatError { .. } => true,
            GatewayError::JsonError(_) => true,
            GatewayError::AuthError(_) => false,
            GatewayError::InvalidRequest(_) => false,
        }
    }
}

/// Converts reqwest errors, keeping timeouts distinguishable.
impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout(err.to_string())
        } else {
            GatewayError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}

/// Input rejected before any model is contacted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{kind} cannot be empty")]
    Empty { kind: PromptKind },
    #[error("{kind} is too long ({length} characters). Maximum allowed: {max} characters")]
    TooLong {
        kind: PromptKind,
        length: usize,
        max: usize,
    },
    #[error("{kind} contains invalid null bytes")]
    InvalidCharacter { kind: PromptKind },
    #[error("Temperature must be between 0 and 1, got {0}")]
    TemperatureOutOfRange(f32),
}
