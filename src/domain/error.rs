use thiserror::Error;

/// Everything that can go wrong while asking the provider for text.
///
/// Every variant renders to a human-readable message, so callers that only
/// want something to show the user can format the error directly.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("Please set your API key: {0}")]
    Configuration(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request to the API failed: {0}")]
    Transport(String),

    #[error("API responded with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode API response: {0}")]
    Decode(String),

    #[error("No response generated from the API")]
    EmptyResponse,

    #[error("Malformed response from the API")]
    MalformedResponse,
}

impl GenerationError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// HTTP status reported by the provider, if the failure was an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Transport(_) => "transport",
            Self::Api { .. } => "api",
            Self::Decode(_) => "decode",
            Self::EmptyResponse => "empty_response",
            Self::MalformedResponse => "malformed_response",
        }
    }
}

/// Outcome of a single generation call.
pub type GenerationResult = Result<String, GenerationError>;

/// Collapse a generation result into text that can always be displayed.
///
/// Failures become `"Error: <message>"`.
pub fn render_result_text(result: GenerationResult) -> String {
    match result {
        Ok(text) => text,
        Err(e) => format!("Error: {e}"),
    }
}
