use thiserror::Error;

/// Remote error code returned when the platform's queue capacity is reached.
/// Start calls failing with this code are always safe to retry and must not
/// count against any retry budget.
pub const QUEUE_LIMIT_EXCEEDED: u32 = 8004;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("API error {code}: {message}")]
    Api { code: u32, message: String },

    #[error("unexpected response payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response is missing the expected `{field}` field")]
    MissingData { field: &'static str },

    #[error("invalid base URL `{0}`")]
    InvalidBaseUrl(String),

    #[error("{0} contains characters not allowed in an HTTP header")]
    InvalidHeader(&'static str),

    #[error("encoding task failed: {}", messages.join("; "))]
    TaskFailed { messages: Vec<String> },

    #[error("timed out waiting for {operation} after {seconds} seconds")]
    Timeout {
        operation: &'static str,
        seconds: u64,
    },
}

impl ApiError {
    pub fn api(code: u32, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Whether this error is the platform's "queue limit exceeded" rejection.
    pub fn is_queue_limit_exceeded(&self) -> bool {
        matches!(self, Self::Api { code, .. } if *code == QUEUE_LIMIT_EXCEEDED)
    }

    /// Remote error code, if this error originated from an API error body.
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
